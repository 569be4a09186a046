//! Asset loading.
//!
//! On native targets assets are read on the app's tokio runtime from the first
//! of [`asset_dirs`] holding the file; on the web they are fetched relative to
//! `<origin>/assets/`.
//! Loads never block a frame: [`Loader::load_texture`] hands back a
//! [`PendingTexture`] that the owner polls once per frame.

use futures::channel::oneshot;

use crate::data_structures::texture::Texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    use anyhow::Context;

    let window = web_sys::window().context("No window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("Page origin is not available"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

/// Native asset search path: `./assets` next to the working directory, then the
/// copy the build script left in `OUT_DIR`, then the crate's own `assets/`.
#[cfg(not(target_arch = "wasm32"))]
pub fn asset_dirs() -> [std::path::PathBuf; 3] {
    use std::path::Path;

    [
        Path::new("./").join("assets"),
        Path::new(env!("OUT_DIR")).join("assets"),
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
    ]
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        use anyhow::Context;

        let mut last_error = None;
        let mut found = None;
        for dir in asset_dirs() {
            let path = dir.join(file_name);
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    found = Some(bytes);
                    break;
                }
                Err(e) => last_error = Some((path, e)),
            }
        }
        match (found, last_error) {
            (Some(bytes), _) => bytes,
            (None, Some((path, e))) => {
                return Err(e).with_context(|| format!("Could not read {}", path.display()));
            }
            (None, None) => anyhow::bail!("No asset directory to read {file_name} from"),
        }
    };

    Ok(data)
}

/// Spawns asset loads on the platform's executor.
#[derive(Clone, Debug)]
pub struct Loader {
    #[cfg(not(target_arch = "wasm32"))]
    handle: tokio::runtime::Handle,
}

impl Loader {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {}
    }

    /// Start reading `file_name`; the result arrives on the returned channel.
    pub fn load_binary(&self, file_name: &str) -> oneshot::Receiver<anyhow::Result<Vec<u8>>> {
        let (tx, rx) = oneshot::channel();
        let file_name = file_name.to_string();
        let load = async move {
            let result = load_binary(&file_name).await;
            // the receiver is gone when its material was dropped first
            let _ = tx.send(result);
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.handle.spawn(load);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load);
        rx
    }

    pub fn load_texture(&self, file_name: &str) -> PendingTexture {
        log::info!("Loading texture {}", file_name);
        PendingTexture {
            name: file_name.to_string(),
            rx: self.load_binary(file_name),
        }
    }
}

/// A texture whose file contents are still on their way.
#[derive(Debug)]
pub struct PendingTexture {
    pub name: String,
    rx: oneshot::Receiver<anyhow::Result<Vec<u8>>>,
}

impl PendingTexture {
    /// A pending texture fed from an existing channel.
    pub fn from_receiver(name: &str, rx: oneshot::Receiver<anyhow::Result<Vec<u8>>>) -> Self {
        Self {
            name: name.to_string(),
            rx,
        }
    }

    /// File contents once they have arrived. `None` while still loading.
    pub fn try_take(&mut self) -> Option<anyhow::Result<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(anyhow::anyhow!(
                "Loading {} was cancelled",
                self.name
            ))),
        }
    }

    /// Decoded texture once loaded. Load and decode failures are logged and
    /// reported as `Some(None)`: the caller keeps its placeholder.
    pub fn poll(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Option<Option<Texture>> {
        let bytes = self.try_take()?;
        let texture = bytes.and_then(|bytes| Texture::from_bytes(device, queue, &bytes, &self.name));
        match texture {
            Ok(texture) => {
                log::info!("Texture {} loaded", self.name);
                Some(Some(texture))
            }
            Err(e) => {
                log::warn!("Texture {} unavailable, rendering untextured: {:#}", self.name, e);
                Some(None)
            }
        }
    }
}
