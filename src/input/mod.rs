use anyhow::{Context, Result};
use fs_err as fs;
use std::io::{self, BufRead, Read};
use std::path::Path;

/// Larger inputs are cut; the prompt has a word ceiling anyway.
pub const MAX_INPUT_BYTES: usize = 64 * 1024;

/// Reads business data from `path` ("-" is stdin), keeping at most
/// `max_bytes` and replacing invalid UTF-8.
pub fn read_data(path: &Path, max_bytes: usize) -> Result<String> {
    let data = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf).context("reading stdin")?;
        buf
    } else {
        fs::read(path)?
    };
    let slice = if data.len() > max_bytes { &data[..max_bytes] } else { &data[..] };
    Ok(String::from_utf8_lossy(slice).into_owned())
}

/// What the user typed in one turn of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Submit(String),
    Tone(String),
    History,
    Quit,
}

/// Reads one turn: either a `:command` line or a block of lines ended by a
/// blank line. A blank first line submits empty data. `None` at EOF.
pub fn read_turn<R: BufRead>(reader: &mut R) -> io::Result<Option<SessionInput>> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(if lines.is_empty() { None } else { Some(SessionInput::Submit(lines.join("\n"))) });
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if lines.is_empty() {
            if let Some(cmd) = line.trim().strip_prefix(':') {
                let (name, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
                match name {
                    "quit" | "q" | "exit" => return Ok(Some(SessionInput::Quit)),
                    "tone" => return Ok(Some(SessionInput::Tone(arg.trim().to_string()))),
                    "history" => return Ok(Some(SessionInput::History)),
                    _ => {}
                }
            }
        }

        if line.trim().is_empty() {
            return Ok(Some(SessionInput::Submit(lines.join("\n"))));
        }
        lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blocks_end_at_blank_lines() {
        let mut r = Cursor::new("Sales: $4.2k\nAds: $150\n\n\n:tone tough love\n:history\nlast\n");
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Submit("Sales: $4.2k\nAds: $150".into())));
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Submit(String::new())));
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Tone("tough love".into())));
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::History));
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Submit("last".into())));
        assert_eq!(read_turn(&mut r).unwrap(), None);
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut r = Cursor::new(":ratio 3\n\n:quit\n");
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Submit(":ratio 3".into())));
        assert_eq!(read_turn(&mut r).unwrap(), Some(SessionInput::Quit));
    }

    #[test]
    fn data_file_is_truncated_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("today.txt");
        std::fs::write(&path, "Sales: $4.2k yesterday").unwrap();
        assert_eq!(read_data(&path, 5).unwrap(), "Sales");
        assert_eq!(read_data(&path, MAX_INPUT_BYTES).unwrap(), "Sales: $4.2k yesterday");
        assert!(read_data(&dir.path().join("missing.txt"), 10).is_err());
    }
}
