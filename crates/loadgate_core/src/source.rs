//! Asset retrieval backends
//!
//! [`AssetSource`] is the contract between the orchestrator and whatever
//! performs actual retrieval and decoding. [`FileSource`] is the built-in
//! backend: a worker thread reads files in chunks and reports progress
//! through a channel, so the caller's loop never blocks.

use std::collections::VecDeque;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

use crate::asset_error::AssetError;
use crate::tracker::LoadTicket;

/// Default chunk size for file reads (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Event reported by an asset source for one tracked load
#[derive(Debug)]
pub enum SourceEvent<A> {
    /// Retrieval progress. `total` is present only when the payload size
    /// is known.
    Progress {
        /// The load this event belongs to
        ticket: LoadTicket,
        /// Bytes retrieved so far
        loaded: u64,
        /// Total bytes, when known
        total: Option<u64>,
    },
    /// Terminal success: the decoded payload
    Loaded {
        /// The load this event belongs to
        ticket: LoadTicket,
        /// Decoded asset payload
        asset: A,
    },
    /// Terminal failure
    Failed {
        /// The load this event belongs to
        ticket: LoadTicket,
        /// What went wrong
        error: AssetError,
    },
}

/// Contract for asynchronous asset retrieval
///
/// Per ticket the source emits zero or more `Progress` events followed by
/// exactly one terminal `Loaded` or `Failed`. Events for different tickets
/// may interleave in any order, since loads run concurrently and
/// independently.
pub trait AssetSource {
    /// Decoded payload type handed back to the caller (owned data)
    type Asset: 'static;

    /// Begin retrieval of `path`. Must not block.
    fn request(&mut self, ticket: LoadTicket, path: &str);

    /// Drain one pending event, if any (non-blocking)
    fn poll(&mut self) -> Option<SourceEvent<Self::Asset>>;
}

/// Trait for payload types that can be decoded from raw bytes
///
/// Implement this for whatever a loaded asset means to your application.
/// The type must be `Send + 'static` so decoding can happen off-thread.
pub trait AssetPayload: Sized + Send + 'static {
    /// Decode this payload from the raw bytes of `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the bytes cannot be decoded.
    fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, AssetError>;
}

/// Request handed to the worker thread
struct FileRequest {
    ticket: LoadTicket,
    path: PathBuf,
}

/// File-backed asset source using a dedicated worker thread
///
/// The worker receives requests over a channel, reads each file in chunks
/// while emitting `Progress` events (total size taken from file metadata),
/// then decodes the bytes via [`AssetPayload`] and emits the terminal
/// event. Results are drained on the caller's thread via
/// [`poll`](FileSource::poll).
pub struct FileSource<A: AssetPayload> {
    /// Channel to send requests to the worker thread
    sender: Sender<FileRequest>,
    /// Channel to receive events from the worker thread
    receiver: Receiver<SourceEvent<A>>,
    /// Events produced without reaching the worker (failed handoff)
    local: VecDeque<SourceEvent<A>>,
}

impl<A: AssetPayload> FileSource<A> {
    /// Create a new file source with the default chunk size
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a new file source reading `chunk_size` bytes per progress step
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let (request_tx, request_rx) = channel::<FileRequest>();
        let (event_tx, event_rx) = channel::<SourceEvent<A>>();

        thread::spawn(move || {
            // Worker loop: process requests until the channel closes
            while let Ok(request) = request_rx.recv() {
                let ticket = request.ticket;
                let event = match read_chunked(&request.path, ticket, chunk_size, &event_tx) {
                    Ok(bytes) => match A::from_bytes(&request.path, bytes) {
                        Ok(asset) => SourceEvent::Loaded { ticket, asset },
                        Err(error) => SourceEvent::Failed { ticket, error },
                    },
                    Err(error) => SourceEvent::Failed { ticket, error },
                };
                // If the receiver is dropped, we stop
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: event_rx,
            local: VecDeque::new(),
        }
    }
}

impl<A: AssetPayload> AssetSource for FileSource<A> {
    type Asset = A;

    fn request(&mut self, ticket: LoadTicket, path: &str) {
        let request = FileRequest {
            ticket,
            path: PathBuf::from(path),
        };
        if self.sender.send(request).is_err() {
            // Worker thread has exited; surface the failure on the next poll
            log::warn!("asset source worker is gone, failing '{}'", path);
            self.local.push_back(SourceEvent::Failed {
                ticket,
                error: AssetError::SourceClosed,
            });
        }
    }

    fn poll(&mut self) -> Option<SourceEvent<A>> {
        if let Some(event) = self.local.pop_front() {
            return Some(event);
        }
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl<A: AssetPayload> Default for FileSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `path` in chunks, emitting a progress event after each chunk
fn read_chunked<A>(
    path: &Path,
    ticket: LoadTicket,
    chunk_size: usize,
    events: &Sender<SourceEvent<A>>,
) -> Result<Vec<u8>, AssetError> {
    let mut file = fs::File::open(path)?;
    let total = file.metadata().ok().map(|m| m.len());

    // Progress baseline so the caller sees the total before the first chunk
    let _ = events.send(SourceEvent::Progress {
        ticket,
        loaded: 0,
        total,
    });

    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);
        let _ = events.send(SourceEvent::Progress {
            ticket,
            loaded: bytes.len() as u64,
            total,
        });
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    /// A simple test payload: the file contents as a string
    #[derive(Debug, PartialEq)]
    struct TextAsset {
        content: String,
    }

    impl AssetPayload for TextAsset {
        fn from_bytes(_path: &Path, bytes: Vec<u8>) -> Result<Self, AssetError> {
            let content = String::from_utf8(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
            Ok(TextAsset { content })
        }
    }

    /// Helper to create a temp file with given content, returning its path
    fn create_temp_file(name: &str, content: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join("loadgate_source_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn cleanup_temp_file(path: &Path) {
        let _ = fs::remove_file(path);
    }

    /// Drain events for up to two seconds, stopping after a terminal event
    fn collect_events(source: &mut FileSource<TextAsset>) -> Vec<SourceEvent<TextAsset>> {
        let mut events = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while std::time::Instant::now() < deadline {
            match source.poll() {
                Some(event) => {
                    let terminal = matches!(
                        event,
                        SourceEvent::Loaded { .. } | SourceEvent::Failed { .. }
                    );
                    events.push(event);
                    if terminal {
                        break;
                    }
                }
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
        events
    }

    #[test]
    fn test_source_construction() {
        let _source: FileSource<TextAsset> = FileSource::new();
        let _source: FileSource<TextAsset> = FileSource::default();
    }

    #[test]
    fn test_poll_returns_none_when_idle() {
        let mut source: FileSource<TextAsset> = FileSource::new();
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_load_delivers_progress_then_payload() {
        let path = create_temp_file("delivers.txt", b"hello loader");
        let mut source: FileSource<TextAsset> = FileSource::with_chunk_size(4);
        source.request(LoadTicket(0), path.to_str().unwrap());

        let events = collect_events(&mut source);
        assert!(events.len() >= 2, "expected progress plus terminal event");

        // All progress events carry the known total and belong to our ticket
        let mut last_loaded = 0;
        for event in &events[..events.len() - 1] {
            match event {
                SourceEvent::Progress {
                    ticket,
                    loaded,
                    total,
                } => {
                    assert_eq!(*ticket, LoadTicket(0));
                    assert_eq!(*total, Some(12));
                    assert!(*loaded >= last_loaded);
                    last_loaded = *loaded;
                }
                other => panic!("expected progress before terminal event, got {:?}", other),
            }
        }

        match events.last().unwrap() {
            SourceEvent::Loaded { ticket, asset } => {
                assert_eq!(*ticket, LoadTicket(0));
                assert_eq!(asset.content, "hello loader");
            }
            other => panic!("expected Loaded, got {:?}", other),
        }

        cleanup_temp_file(&path);
    }

    #[test]
    fn test_missing_file_fails() {
        let mut source: FileSource<TextAsset> = FileSource::new();
        source.request(LoadTicket(3), "/nonexistent/scene/helmet.glb");

        let events = collect_events(&mut source);
        match events.last() {
            Some(SourceEvent::Failed { ticket, error }) => {
                assert_eq!(*ticket, LoadTicket(3));
                assert!(matches!(error, AssetError::Io(_)));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_bytes_fail() {
        let path = create_temp_file("binary.bin", &[0xff, 0xfe, 0x00, 0x80]);
        let mut source: FileSource<TextAsset> = FileSource::new();
        source.request(LoadTicket(1), path.to_str().unwrap());

        let events = collect_events(&mut source);
        match events.last() {
            Some(SourceEvent::Failed { ticket, error }) => {
                assert_eq!(*ticket, LoadTicket(1));
                assert!(matches!(error, AssetError::Decode(_)));
            }
            other => panic!("expected Failed, got {:?}", other),
        }

        cleanup_temp_file(&path);
    }

    #[test]
    fn test_interleaved_requests_all_terminate() {
        let path_a = create_temp_file("inter_a.txt", b"aaaa");
        let path_b = create_temp_file("inter_b.txt", b"bbbbbbbb");
        let mut source: FileSource<TextAsset> = FileSource::with_chunk_size(2);
        source.request(LoadTicket(0), path_a.to_str().unwrap());
        source.request(LoadTicket(1), path_b.to_str().unwrap());

        // Wait for both terminal events
        let mut loaded = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while loaded.len() < 2 && std::time::Instant::now() < deadline {
            match source.poll() {
                Some(SourceEvent::Loaded { ticket, asset }) => {
                    loaded.push((ticket, asset.content));
                }
                Some(SourceEvent::Failed { error, .. }) => panic!("unexpected failure: {}", error),
                Some(SourceEvent::Progress { .. }) => {}
                None => thread::sleep(Duration::from_millis(5)),
            }
        }

        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(&(LoadTicket(0), "aaaa".to_string())));
        assert!(loaded.contains(&(LoadTicket(1), "bbbbbbbb".to_string())));

        cleanup_temp_file(&path_a);
        cleanup_temp_file(&path_b);
    }

    #[test]
    fn test_empty_file_loads_without_progress_chunks() {
        let path = create_temp_file("empty.txt", b"");
        let mut source: FileSource<TextAsset> = FileSource::new();
        source.request(LoadTicket(0), path.to_str().unwrap());

        let events = collect_events(&mut source);
        match events.last() {
            Some(SourceEvent::Loaded { asset, .. }) => assert_eq!(asset.content, ""),
            other => panic!("expected Loaded, got {:?}", other),
        }

        cleanup_temp_file(&path);
    }
}
