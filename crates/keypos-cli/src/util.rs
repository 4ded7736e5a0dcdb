use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use keypos_analysis::{builder::SequenceBuilder, record::GameInfo};
use keypos_engine::PgnGame;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    Ok(value)
}

/// Game input shared by the subcommands: a PGN file or an inline move list.
#[derive(Debug, Clone, clap::Args)]
pub struct GameSourceArg {
    /// Path to a PGN game file
    #[arg(long, conflicts_with = "moves")]
    pgn: Option<PathBuf>,
    /// Inline whitespace-separated SAN move list
    #[arg(long, required_unless_present = "pgn")]
    moves: Option<String>,
    /// Index of this game within a larger batch
    #[arg(long, default_value_t = 0)]
    game_index: u32,
}

impl GameSourceArg {
    /// Replays the game source into its position sequence.
    ///
    /// A PGN source contributes its tag pairs as game metadata and is
    /// replayed fail-fast; an inline move list carries no metadata and
    /// skips unplayable entries.
    pub fn build_positions(&self) -> anyhow::Result<Vec<keypos_analysis::record::PositionRecord>> {
        if let Some(path) = &self.pgn {
            let record = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read PGN file: {}", path.display()))?;
            let game = PgnGame::parse(&record)
                .with_context(|| format!("Failed to parse PGN file: {}", path.display()))?;
            let info = Arc::new(GameInfo::from_tags(game.tags.clone()));
            let builder = SequenceBuilder::new(self.game_index, info);
            Ok(builder.from_game_record(&record))
        } else {
            let moves = self.moves.as_deref().unwrap_or_default();
            let builder = SequenceBuilder::new(self.game_index, Arc::new(GameInfo::default()));
            Ok(builder.from_moves(moves.split_whitespace()))
        }
    }
}
