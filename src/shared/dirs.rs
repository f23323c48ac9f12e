use std::path::PathBuf;

/// `$XDG_CONFIG_HOME`, else `$HOME/.config`. Empty values count as unset.
pub fn config_dir() -> Option<PathBuf> {
    let var = |key| std::env::var(key).ok().filter(|v: &String| !v.is_empty());
    var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))
}
