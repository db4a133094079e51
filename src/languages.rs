//! Fenced code block labels for file extensions.

/// Extension to highlight label.
const LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "zsh"),
    ("fish", "fish"),
    ("ps1", "powershell"),
    ("html", "html"),
    ("htm", "html"),
    ("xml", "xml"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("conf", "ini"),
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("rst", "rst"),
    ("txt", "text"),
    ("sql", "sql"),
    ("dockerfile", "dockerfile"),
    ("makefile", "makefile"),
    ("r", "r"),
    ("rmd", "rmarkdown"),
    ("tex", "latex"),
    ("vim", "vim"),
    ("lua", "lua"),
    ("pl", "perl"),
    ("pm", "perl"),
];

/// Label for an extension given without its dot; empty when unknown.
pub fn language_for_extension(extension: &str) -> &'static str {
    let extension = extension.to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| *lang)
        .unwrap_or("")
}
