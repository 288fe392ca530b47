// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! `:` prompt commands.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use crate::chart::Direction;

/// A parsed prompt command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `bpm <value>`; raw text so invalid input can be absorbed
    Bpm(String),
    /// `sub <value>`
    Subdivisions(String),
    /// `delay <ms>`
    PreDelay(String),
    /// `beat <n>` on the selected note
    Beat(u32),
    /// `dir <name>` on the selected note
    Direction(Direction),
    /// `go <seconds>`: seek during playback
    Seek(f64),
    /// `w [path]`: export the chart
    Write(Option<PathBuf>),
    /// `e <path>`: open a chart
    Edit(PathBuf),
    /// `audio <path>`: probe an audio file for its length
    Audio(PathBuf),
    /// `q`
    Quit,
}

impl Command {
    /// Parse a prompt line. The leading `:` is optional.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim().trim_start_matches(':').trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> Result<&str> {
            if arg.is_empty() {
                Err(anyhow!("{} needs {}", name, what))
            } else {
                Ok(arg)
            }
        };

        let command = match name {
            "bpm" => Command::Bpm(required("a tempo")?.to_string()),
            "sub" | "subdivisions" => Command::Subdivisions(required("a count")?.to_string()),
            "delay" => Command::PreDelay(required("milliseconds")?.to_string()),
            "beat" => {
                let value = required("a beat")?;
                Command::Beat(value.parse().map_err(|_| anyhow!("Invalid beat: {}", value))?)
            }
            "dir" => {
                let value = required("a direction")?;
                let direction = Direction::CYCLE
                    .into_iter()
                    .find(|d| d.as_str().eq_ignore_ascii_case(value))
                    .ok_or_else(|| anyhow!("Unknown direction: {}", value))?;
                Command::Direction(direction)
            }
            "go" => {
                let value = required("seconds")?;
                Command::Seek(value.parse().map_err(|_| anyhow!("Invalid time: {}", value))?)
            }
            "w" | "write" => Command::Write((!arg.is_empty()).then(|| PathBuf::from(arg))),
            "e" | "edit" => Command::Edit(PathBuf::from(required("a path")?)),
            "audio" => Command::Audio(PathBuf::from(required("a path")?)),
            "q" | "quit" => Command::Quit,
            "" => bail!("Empty command"),
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timing() {
        assert_eq!(Command::parse("bpm 140").unwrap(), Command::Bpm("140".into()));
        assert_eq!(Command::parse(":sub 8").unwrap(), Command::Subdivisions("8".into()));
        assert_eq!(Command::parse("delay  2500 ").unwrap(), Command::PreDelay("2500".into()));
        // Kept as text; rejected later without touching the timing
        assert_eq!(Command::parse("bpm abc").unwrap(), Command::Bpm("abc".into()));
    }

    #[test]
    fn test_parse_note_edits() {
        assert_eq!(Command::parse("beat 48").unwrap(), Command::Beat(48));
        assert_eq!(
            Command::parse("dir upleft").unwrap(),
            Command::Direction(Direction::UpLeft)
        );
        assert!(Command::parse("beat -3").is_err());
        assert!(Command::parse("dir sideways").is_err());
    }

    #[test]
    fn test_parse_files() {
        assert_eq!(Command::parse("w").unwrap(), Command::Write(None));
        assert_eq!(
            Command::parse("w out/chart.json").unwrap(),
            Command::Write(Some(PathBuf::from("out/chart.json")))
        );
        assert_eq!(
            Command::parse("e my chart.json").unwrap(),
            Command::Edit(PathBuf::from("my chart.json"))
        );
        assert!(Command::parse("e").is_err());
        assert_eq!(
            Command::parse("audio song.wav").unwrap(),
            Command::Audio(PathBuf::from("song.wav"))
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("go 12.5").unwrap(), Command::Seek(12.5));
        assert!(Command::parse("").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }
}
