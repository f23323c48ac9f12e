//! Fill-in-the-blank CI templates.

use indoc::formatdoc;
use lazy_regex::regex_is_match;

/// Values substituted into the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blanks {
    pub project: String,
    pub main_branch: String,
    pub test_branch: String,
    pub install: String,
    pub build: String,
    pub test: String,
    pub deploy: String,
}

impl Blanks {
    pub fn defaults(project: &str, main_branch: &str, test_branch: &str) -> Self {
        Self {
            project: project.to_string(),
            main_branch: main_branch.to_string(),
            test_branch: test_branch.to_string(),
            install: "echo 'install dependencies'".to_string(),
            build: "echo 'build'".to_string(),
            test: "echo 'run tests'".to_string(),
            deploy: "echo 'deploy'".to_string(),
        }
    }
}

/// A file to write, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: &'static str,
    pub content: String,
}

/// Emit `value` as a YAML scalar, single-quoting it unless it is plainly safe.
fn scalar(value: &str) -> String {
    if regex_is_match!(r"^[A-Za-z0-9_./=+-][A-Za-z0-9_ ./=+-]*$", value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

pub fn github(blanks: &Blanks) -> Vec<RenderedFile> {
    let ci_name = scalar(&format!("{} CI", blanks.project));
    let deploy_name = scalar(&format!("{} Deploy", blanks.project));
    let main = scalar(&blanks.main_branch);
    let test = scalar(&blanks.test_branch);
    let install = scalar(&blanks.install);
    let build = scalar(&blanks.build);
    let test_command = scalar(&blanks.test);
    let deploy = scalar(&blanks.deploy);

    let ci = formatdoc! {"
        name: {ci_name}

        on:
          push:
            branches: [{main}, {test}]
          pull_request:
            branches: [{main}]

        jobs:
          build:
            runs-on: ubuntu-latest
            steps:
              - uses: actions/checkout@v4
              - name: Install
                run: {install}
              - name: Build
                run: {build}
              - name: Test
                run: {test_command}
    "};

    let deploy_workflow = formatdoc! {"
        name: {deploy_name}

        on:
          push:
            branches: [{main}]
          workflow_dispatch:

        concurrency:
          group: deploy-${{{{ github.ref }}}}
          cancel-in-progress: false

        jobs:
          deploy:
            runs-on: ubuntu-latest
            environment: production
            steps:
              - uses: actions/checkout@v4
              - name: Install
                run: {install}
              - name: Build
                run: {build}
              - name: Deploy
                run: {deploy}
    "};

    vec![
        RenderedFile {
            path: ".github/workflows/ci.yml",
            content: ci,
        },
        RenderedFile {
            path: ".github/workflows/deploy.yml",
            content: deploy_workflow,
        },
    ]
}

pub fn gitlab(blanks: &Blanks) -> Vec<RenderedFile> {
    let project = &blanks.project;
    let main = blanks.main_branch.replace('"', "\\\"");
    let test = blanks.test_branch.replace('"', "\\\"");
    let install = scalar(&blanks.install);
    let build = scalar(&blanks.build);
    let test_command = scalar(&blanks.test);
    let deploy = scalar(&blanks.deploy);

    let content = formatdoc! {r#"
        # CI for {project}

        stages:
          - build
          - test
          - deploy

        default:
          before_script:
            - {install}

        build:
          stage: build
          script:
            - {build}

        test:
          stage: test
          script:
            - {test_command}
          rules:
            - if: $CI_COMMIT_BRANCH == "{main}" || $CI_COMMIT_BRANCH == "{test}" || $CI_MERGE_REQUEST_IID

        deploy:
          stage: deploy
          script:
            - {deploy}
          environment: production
          rules:
            - if: $CI_COMMIT_BRANCH == "{main}"
    "#};

    vec![RenderedFile {
        path: ".gitlab-ci.yml",
        content,
    }]
}
