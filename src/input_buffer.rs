//! Whole-file input: a memory-mapped file, or everything on stdin.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use memmap::{Mmap, MmapOptions};

use errors::{Result, ResultExt};

pub enum InputBuffer {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl InputBuffer {
    /// Open `path` for reading, or slurp stdin if the path is `-`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<InputBuffer> {
        let path = path.as_ref();
        if path == Path::new("-") {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            return Ok(InputBuffer::Owned(buf));
        }

        let file = File::open(path).chain_err(|| format!("couldn't open {}", path.display()))?;
        // Zero-length mappings are an error on some platforms
        if file.metadata()?.len() == 0 {
            return Ok(InputBuffer::Owned(Vec::new()));
        }
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        debug!("mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(InputBuffer::Mapped(mmap))
    }

    pub fn bytes(&self) -> &[u8] {
        match *self {
            InputBuffer::Owned(ref v) => &*v,
            InputBuffer::Mapped(ref m) => &*m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn maps_files() {
        let path = env::temp_dir().join(format!("idplaysim-input-{}.wad", ::std::process::id()));
        fs::write(&path, b"PWAD").unwrap();
        let input = InputBuffer::open(&path).unwrap();
        assert_eq!(input.bytes(), b"PWAD");
        drop(input);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_files_are_errors() {
        assert!(InputBuffer::open("/nonexistent/idplaysim.wad").is_err());
    }
}
