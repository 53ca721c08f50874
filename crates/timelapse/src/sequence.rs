use {
    crate::*,
    std::{
        fs::{self, File},
        io::{self, Write},
        path::{Path, PathBuf},
    },
};

/// Naming of saved frames: `<prefix>_<zero-padded index>.<extension>`.
///
/// The capture loop writes with it and the video compiler reads with it, so
/// both always agree on the file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePattern {
    prefix: &'static str,
    width: usize,
    extension: &'static str,
}

/// The pattern every session uses: `image_00001.jpg`, `image_00002.jpg`, ...
pub const FRAME_PATTERN: FramePattern = FramePattern {
    prefix: "image",
    width: 5,
    extension: "jpg",
};

impl FramePattern {
    pub fn file_name(&self, index: u64) -> String {
        format!(
            "{}_{:0width$}.{}",
            self.prefix,
            index,
            self.extension,
            width = self.width
        )
    }

    pub fn path(&self, dir: &Path, index: u64) -> PathBuf {
        dir.join(self.file_name(index))
    }

    /// printf-style pattern understood by ffmpeg's image2 demuxer.
    pub fn encoder_pattern(&self) -> String {
        format!("{}_%0{}d.{}", self.prefix, self.width, self.extension)
    }

    /// Index of a file name produced by this pattern.
    pub fn parse_index(&self, file_name: &str) -> Option<u64> {
        let digits = file_name
            .strip_prefix(self.prefix)?
            .strip_prefix('_')?
            .strip_suffix(self.extension)?
            .strip_suffix('.')?;
        if digits.len() < self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Sorted indices of the frames present in `dir`.
    pub fn saved_indices(&self, dir: &Path) -> io::Result<Vec<u64>> {
        let mut indices = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(index) = entry.file_name().to_str().and_then(|n| self.parse_index(n)) {
                indices.push(index);
            }
        }
        indices.sort_unstable();
        Ok(indices)
    }

    /// Write frame `index` to `dir`.
    ///
    /// The bytes land in a hidden temporary file first and are renamed into
    /// place, so a failed write never leaves a truncated frame under its final name.
    pub fn write_frame(&self, dir: &Path, index: u64, jpeg: &[u8]) -> Result<PathBuf, CaptureError> {
        let path = self.path(dir, index);
        let partial = dir.join(format!(".{}.part", self.file_name(index)));

        fn write_then_rename(partial: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
            let mut file = File::create(partial)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(partial, path)
        }

        match write_then_rename(&partial, &path, jpeg) {
            Ok(()) => Ok(path),
            Err(source) => {
                let _ = fs::remove_file(&partial);
                Err(CaptureError::Persist { path, source })
            }
        }
    }
}
