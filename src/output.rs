use crate::colors::Colors;
use crate::config::Settings;
use crate::editor::{EditorOptions, Problem, ProblemKind, SaveResult};
use crate::properties::PropertyMap;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
    Diff,
}

pub struct Config {
    /// Check saved-file conformance instead of printing properties
    pub check_only: bool,
    pub output_mode: OutputMode,
    /// Print editor options instead of raw properties
    pub show_editor: bool,
    pub settings: Settings,
}

impl Config {
    /// Whether files are read and run through the save preview.
    pub fn previews_saves(&self) -> bool {
        self.check_only || self.output_mode == OutputMode::Diff
    }
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files_resolved: usize,
    pub files_with_problems: usize,
    /// Files that could not be resolved at all
    pub errors: usize,
}

impl RunResult {
    pub fn has_problems(&self) -> bool {
        self.files_with_problems > 0
    }
}

/// `[path]` header used when more than one file is reported.
pub fn format_header(path: &Path, ctx: &OutputContext) -> String {
    ctx.colors.paint(ctx.colors.key, &format!("[{}]", path.display()))
}

/// One `key=value` line per resolved property, in resolution order.
pub fn format_properties(properties: &PropertyMap, ctx: &OutputContext) -> String {
    let mut out = String::new();
    for (key, value) in properties {
        let _ = writeln!(out, "{}={value}", ctx.colors.paint(ctx.colors.key, key));
    }
    out.truncate(out.trim_end_matches('\n').len());
    out
}

pub fn format_editor_options(options: &EditorOptions, ctx: &OutputContext) -> String {
    [
        ("insert_spaces", options.insert_spaces.to_string()),
        ("tab_size", options.tab_size.to_string()),
        ("indent_size", options.indent_size.to_string()),
    ]
    .iter()
    .map(|(key, value)| format!("{}={value}", ctx.colors.paint(ctx.colors.key, key)))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Config files consulted for one resolution, root-most first.
pub fn format_consulted(files: &[PathBuf], ctx: &OutputContext) -> String {
    if files.is_empty() {
        return ctx.colors.paint(ctx.colors.dim, "# no config files apply");
    }
    files
        .iter()
        .map(|f| ctx.colors.paint(ctx.colors.dim, &format!("# from {}", f.display())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe(problem: &Problem) -> String {
    match &problem.kind {
        ProblemKind::TrailingWhitespace => {
            format!("trailing whitespace at line {}", problem.line)
        }
        ProblemKind::MissingFinalNewline => "missing final newline".to_string(),
        ProblemKind::ExtraFinalNewline => {
            format!("final newline after line {}", problem.line)
        }
        ProblemKind::LineEnding { expected } => {
            format!("line {} does not end with {expected}", problem.line)
        }
    }
}

pub fn format_check_result(path: &Path, result: &SaveResult, ctx: &OutputContext) -> String {
    if ctx.mode == OutputMode::Quiet {
        return path.display().to_string();
    }

    let mut out = format!(
        "{}Error:{} {}",
        ctx.colors.error,
        ctx.colors.reset(),
        path.display()
    );
    for problem in &result.problems {
        let _ = write!(out, "\n  - {}", describe(problem));
    }
    out
}

pub fn format_checked(path: &Path, ctx: &OutputContext) -> String {
    format!(
        "{}Checked:{} {}",
        ctx.colors.success,
        ctx.colors.reset(),
        path.display()
    )
}

pub fn format_skipped(path: &Path, reason: &str, ctx: &OutputContext) -> String {
    format!(
        "{}Skipping {}: {}{}",
        ctx.colors.warning,
        reason,
        ctx.colors.reset(),
        path.display()
    )
}

pub fn format_diff(label: &str, original: &str, content: &str) -> String {
    let diff = TextDiff::from_lines(original, content);
    let mut out = format!("--- {label}\n+++ {label}\n");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                let _ = write!(out, "{sign}{change}");
                if change.missing_newline() {
                    out.push_str("\n\\ No newline at end of file\n");
                }
            }
        }
    }

    out.truncate(out.trim_end_matches('\n').len());
    out
}

/// Closing summary, or `None` when there is nothing worth saying.
pub fn format_summary(result: &RunResult, config: &Config, ctx: &OutputContext) -> Option<String> {
    if ctx.mode == OutputMode::Quiet {
        return None;
    }

    let mut parts = vec![];
    if config.check_only && result.files_with_problems > 0 {
        parts.push(ctx.colors.paint(
            ctx.colors.error,
            &format!("{} files with problems", result.files_with_problems),
        ));
    }
    if result.errors > 0 {
        let errors = format!("{} errors", result.errors);
        parts.push(ctx.colors.paint(ctx.colors.warning, &errors));
    }

    (!parts.is_empty()).then(|| format!("\n{}", parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{preview_save, SaveRules};
    use crate::properties::{normalize, EndOfLine};

    fn plain(mode: OutputMode) -> OutputContext {
        OutputContext::new(mode, false, false, false)
    }

    fn config(check_only: bool, output_mode: OutputMode) -> Config {
        Config {
            check_only,
            output_mode,
            show_editor: false,
            settings: Settings::default(),
        }
    }

    #[test]
    fn test_format_properties_in_order() {
        let props = normalize(
            [("indent_style", "space"), ("indent_size", "2")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );

        assert_eq!(
            format_properties(&props, &plain(OutputMode::Normal)),
            "indent_style=space\nindent_size=2\ntab_width=2"
        );
    }

    #[test]
    fn test_format_empty_properties() {
        assert_eq!(
            format_properties(&PropertyMap::default(), &plain(OutputMode::Normal)),
            ""
        );
    }

    #[test]
    fn test_format_editor_options() {
        let options = EditorOptions {
            insert_spaces: false,
            tab_size: 4,
            indent_size: 4,
        };
        assert_eq!(
            format_editor_options(&options, &plain(OutputMode::Normal)),
            "insert_spaces=false\ntab_size=4\nindent_size=4"
        );
    }

    #[test]
    fn test_format_check_result_lists_problems() {
        let rules = SaveRules {
            trim_trailing_whitespace: true,
            insert_final_newline: Some(true),
            default_newline: EndOfLine::Lf,
            ..SaveRules::default()
        };
        let result = preview_save("a  \nb", &rules);

        let text = format_check_result(Path::new("x.txt"), &result, &plain(OutputMode::Normal));
        assert_eq!(
            text,
            "Error: x.txt\n  - trailing whitespace at line 1\n  - missing final newline"
        );
    }

    #[test]
    fn test_format_check_result_quiet_is_path_only() {
        let result = preview_save(
            "a\r\n",
            &SaveRules {
                end_of_line: Some(EndOfLine::Lf),
                ..SaveRules::default()
            },
        );
        let text = format_check_result(Path::new("x.txt"), &result, &plain(OutputMode::Quiet));
        assert_eq!(text, "x.txt");
    }

    #[test]
    fn test_format_diff() {
        let text = format_diff("x.txt", "a  \nb\n", "a\nb\n");
        assert_eq!(text, "--- x.txt\n+++ x.txt\n-a  \n+a\n b");
    }

    #[test]
    fn test_format_diff_marks_missing_newline() {
        let text = format_diff("x.txt", "a", "a\n");
        assert!(text.contains("-a\n\\ No newline at end of file\n+a"));
    }

    #[test]
    fn test_summary_counts_problems_in_check_mode() {
        let result = RunResult {
            files_resolved: 3,
            files_with_problems: 2,
            errors: 0,
        };
        let ctx = plain(OutputMode::Normal);
        let summary = format_summary(&result, &config(true, OutputMode::Normal), &ctx);
        assert_eq!(summary.as_deref(), Some("\n2 files with problems"));
    }

    #[test]
    fn test_summary_silent_when_clean_or_quiet() {
        let normal = plain(OutputMode::Normal);
        let clean = RunResult::default();
        assert!(format_summary(&clean, &config(true, OutputMode::Normal), &normal).is_none());

        let quiet = plain(OutputMode::Quiet);
        let failing = RunResult {
            files_with_problems: 1,
            ..RunResult::default()
        };
        assert!(format_summary(&failing, &config(true, OutputMode::Quiet), &quiet).is_none());
    }

    #[test]
    fn test_consulted_files() {
        let ctx = plain(OutputMode::Normal);
        assert_eq!(format_consulted(&[], &ctx), "# no config files apply");
        assert_eq!(
            format_consulted(&[PathBuf::from("/p/.editorconfig")], &ctx),
            "# from /p/.editorconfig"
        );
    }
}
