use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TranslationService {
    Free,
    Google,
}

impl Default for TranslationService {
    fn default() -> Self {
        TranslationService::Free
    }
}

/// User-facing configuration, stored with the same wire names the browser side
/// uses (`sinhalaSize`, `apiKey`, ...). Unknown or missing fields fall back to
/// the defaults so older payloads keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub service: TranslationService,
    pub api_key: String,
    pub user_email: String,
    pub sinhala_size: u32,
    pub english_size: u32,
    pub sinhala_position: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: TranslationService::Free,
            api_key: String::new(),
            user_email: String::new(),
            sinhala_size: 120,
            english_size: 100,
            sinhala_position: 10,
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<Settings>,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            Settings::default()
        };

        Ok(Self::with_initial(Some(path), data))
    }

    /// Store without file persistence, for tests and embeddings that own the
    /// real persistence layer themselves.
    pub fn ephemeral(initial: Settings) -> Self {
        Self::with_initial(None, initial)
    }

    fn with_initial(path: Option<PathBuf>, data: Settings) -> Self {
        let (tx, _) = watch::channel(data.clone());
        Self {
            path,
            data: RwLock::new(data),
            tx,
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.data.read().unwrap().clone()
    }

    /// Receiver for change notifications. The value at subscribe time counts
    /// as seen; the current value is always readable through `borrow`.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings.clone();
            self.persist(&guard)?;
        }
        // send_replace keeps the channel value current even with no
        // subscribers attached yet.
        self.tx.send_replace(settings);
        Ok(())
    }

    /// Re-read the backing file, picking up edits made outside this process.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = fs::read_to_string(path)?;
        let data: Settings = serde_json::from_str(&contents)?;
        {
            let mut guard = self.data.write().unwrap();
            *guard = data.clone();
        }
        self.tx.send_replace(data);
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
