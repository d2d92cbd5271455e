//! Keyed image cache and the background loader thread.
//!
//! The cache is the only shared mutable state in the pipeline: a load-once
//! key -> pixmap map that is populated asynchronously and read synchronously.
//! A miss means "not decoded yet", never an error; decode failures are
//! logged by the loader and the key simply stays absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tiny_skia::{IntSize, Pixmap};

/// Messages sent from the loader thread to whoever polls it.
pub enum AssetMsg {
    Loaded(String),
    Failed(String, String),
    Done,
}

/// Append-only image cache. Writes are idempotent set-if-absent, so
/// concurrent duplicate preload requests for the same key are harmless.
#[derive(Default)]
pub struct AssetCache {
    entries: Mutex<HashMap<String, Arc<Pixmap>>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Pixmap>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// First writer wins; later inserts for the same key are ignored.
    /// Returns whether this call performed the insert.
    pub fn insert_if_absent(&self, key: &str, image: Pixmap) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), Arc::new(image));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

/// Decode an image file into a premultiplied RGBA pixmap.
pub fn load_pixmap(path: &Path) -> Result<Pixmap> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {:?}", path))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    pixmap_from_rgba(w, h, img.into_raw())
        .with_context(|| format!("image {:?} has unusable dimensions", path))
}

/// Build a pixmap from straight-alpha RGBA bytes, premultiplying in place.
pub fn pixmap_from_rgba(width: u32, height: u32, mut data: Vec<u8>) -> Option<Pixmap> {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a != 255 {
            px[0] = ((px[0] as u16 * a) / 255) as u8;
            px[1] = ((px[1] as u16 * a) / 255) as u8;
            px[2] = ((px[2] as u16 * a) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(width, height)?)
}

/// Spawn the one-shot preload thread. `priority` (the currently selected
/// background) is decoded first so the first render doesn't wait on the
/// whole enumerated list; remaining keys follow in order. Progress arrives
/// on the returned channel; callers poll it with `try_recv`.
pub fn spawn_loader(
    cache: Arc<AssetCache>,
    priority: Option<String>,
    keys: Vec<String>,
    root: PathBuf,
) -> Receiver<AssetMsg> {
    let (tx, rx) = mpsc::channel::<AssetMsg>();

    thread::spawn(move || {
        let mut ordered: Vec<String> = Vec::with_capacity(keys.len() + 1);
        if let Some(p) = priority {
            ordered.push(p);
        }
        for key in keys {
            if !ordered.contains(&key) {
                ordered.push(key);
            }
        }

        for key in ordered {
            if cache.contains(&key) {
                continue;
            }
            match load_pixmap(&root.join(&key)) {
                Ok(pixmap) => {
                    cache.insert_if_absent(&key, pixmap);
                    log::debug!("preloaded asset {}", key);
                    let _ = tx.send(AssetMsg::Loaded(key));
                }
                Err(err) => {
                    log::warn!("failed to preload asset {}: {:#}", key, err);
                    let _ = tx.send(AssetMsg::Failed(key, format!("{:#}", err)));
                }
            }
        }
        let _ = tx.send(AssetMsg::Done);
    });

    rx
}
