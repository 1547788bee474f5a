use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Script, line-per-directive script or .mesh file
    pub input: PathBuf,
    /// How to read the input
    #[arg(short, long, value_enum, default_value_t = InputKind::Auto)]
    pub kind: InputKind,
    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `mesh` for `.mesh` files, `script` for everything else
    Auto,
    Script,
    Mesh,
    Lines,
}

impl InputKind {
    /// Settles `Auto` from the file extension.
    pub fn resolve(self, input: &Path) -> InputKind {
        match self {
            InputKind::Auto => match input.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("mesh") => InputKind::Mesh,
                _ => InputKind::Script,
            },
            kind => kind,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_kind() {
        let test_cases = vec![
            (InputKind::Auto, "robot.mesh", InputKind::Mesh),
            (InputKind::Auto, "ROBOT.MESH", InputKind::Mesh),
            (InputKind::Auto, "Examples.material", InputKind::Script),
            (InputKind::Auto, "no_extension", InputKind::Script),
            (InputKind::Lines, "robot.mesh", InputKind::Lines),
            (InputKind::Script, "a.mesh", InputKind::Script),
        ];

        for (kind, input, expected) in test_cases {
            assert_eq!(kind.resolve(Path::new(input)), expected, "{kind:?} {input}");
        }
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["axiom-loader", "a.material", "-vv", "--pretty"]).unwrap();
        assert_eq!(cli.kind, InputKind::Auto);
        assert_eq!(cli.verbose, 2);
        assert!(cli.pretty);
        assert_eq!(cli.output, None);
        assert_eq!(cli.log_level(), log::LevelFilter::Trace);

        let cli = Cli::try_parse_from(["axiom-loader", "x", "--kind", "mesh", "-o", "out.json"])
            .unwrap();
        assert_eq!(cli.kind, InputKind::Mesh);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }
}
