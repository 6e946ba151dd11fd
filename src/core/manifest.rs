use std::io::SeekFrom;
use std::os::fd::AsFd;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncSeek, AsyncSeekExt, BufReader};

use crate::error::{CloneError, Result};

/// Value of the input option that selects standard input.
pub const STDIN_MARKER: &str = "-";

pub type BoxedReader = Box<dyn AsyncBufRead + Unpin + Send>;

/// A stream of manifest lines plus its size, when the stream can report one.
pub struct Manifest<R> {
    pub(crate) name: String,
    pub(crate) reader: R,
    pub(crate) total_size: Option<u64>,
}

impl<R: AsyncBufRead + Unpin> Manifest<R> {
    /// Wrap a stream that cannot seek; progress falls back to a line count.
    pub fn unseekable(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            total_size: None,
        }
    }

    /// Wrap a seekable stream, measuring it by seeking to the end and back.
    pub async fn seekable(name: impl Into<String>, mut reader: R) -> Result<Self>
    where
        R: AsyncSeek,
    {
        let name = name.into();
        let total_size = measure_stream(&mut reader)
            .await
            .map_err(|source| CloneError::ManifestUnreadable {
                path: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            reader,
            total_size: Some(total_size),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }
}

/// Measure a stream by seeking to its end, then rewind it.
async fn measure_stream<S: AsyncSeek + Unpin>(stream: &mut S) -> io::Result<u64> {
    let total = stream.seek(SeekFrom::End(0)).await?;
    stream.seek(SeekFrom::Start(0)).await?;
    Ok(total)
}

/// Open the manifest named on the command line; `-` means standard input.
pub async fn open_manifest(input: &str) -> Result<Manifest<BoxedReader>> {
    if input == STDIN_MARKER {
        return open_stdin().await;
    }

    let file = File::open(Path::new(input))
        .await
        .map_err(|source| CloneError::ManifestUnreadable {
            path: input.to_owned(),
            source,
        })?;
    let seekable = Manifest::seekable(input, BufReader::new(file)).await?;

    let reader: BoxedReader = Box::new(seekable.reader);
    Ok(Manifest {
        name: seekable.name,
        reader,
        total_size: seekable.total_size,
    })
}

/// Standard input is measured like a file when it is redirected from one; a
/// pipe or terminal rejects the seek and gets no total.
async fn open_stdin() -> Result<Manifest<BoxedReader>> {
    const NAME: &str = "<stdin>";
    let unreadable = |source| CloneError::ManifestUnreadable {
        path: NAME.to_owned(),
        source,
    };

    let fd = std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map_err(unreadable)?;
    let mut file = File::from_std(std::fs::File::from(fd));

    let total_size = match measure_stream(&mut file).await {
        Ok(total) => Some(total),
        Err(err) if err.kind() == io::ErrorKind::NotSeekable => None,
        Err(err) => return Err(unreadable(err)),
    };

    let reader: BoxedReader = Box::new(BufReader::new(file));
    Ok(Manifest {
        name: NAME.to_owned(),
        reader,
        total_size,
    })
}
