//! Stopword resources.
//!
//! Lists are stored one word per line under `<resource dir>/stopwords/`.
//! A missing list is fetched once on first use; if it still can't be read
//! after that, the error is returned to the caller instead of being retried.

use std::{
    collections::{HashMap, HashSet},
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::language::Language;

pub type StopwordSet = HashSet<String>;

/// Per-language NLTK lists, the same ones `BundledFetcher` writes out.
const DEFAULT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/cmccomb/stop-words/HEAD/src/nltk/{name}";

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch {language} stopwords: {reason}")]
    Fetch { language: Language, reason: String },
    #[error("stopword list {path:?} contains no words")]
    Empty { path: PathBuf },
}

impl ResourceError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ResourceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Something that can materialize a stopword list on disk.
pub trait ResourceFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self, language: Language, dest: &Path) -> Result<(), ResourceError>;
}

/// Writes out the NLTK lists shipped with the `stop-words` crate. Works offline.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledFetcher;

impl ResourceFetcher for BundledFetcher {
    fn name(&self) -> &'static str {
        "bundled"
    }

    fn fetch(&self, language: Language, dest: &Path) -> Result<(), ResourceError> {
        use stop_words::{get, LANGUAGE};

        let lang = match language {
            Language::Spanish => LANGUAGE::Spanish,
            Language::English => LANGUAGE::English,
        };
        let words: Vec<String> = get(lang).iter().map(|s| s.to_string()).collect();
        write_atomically(dest, |writer| {
            for word in &words {
                writeln!(writer, "{}", word)?;
            }
            Ok(())
        })
    }
}

/// Downloads lists over HTTP. In the template `{name}` is replaced by the
/// language name (`english`) and `{code}` by its tag (`en`).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url_template: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE)
    }
}

impl HttpFetcher {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, language: Language) -> String {
        self.url_template
            .replace("{name}", language.name())
            .replace("{code}", language.tag())
    }
}

impl ResourceFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self, language: Language, dest: &Path) -> Result<(), ResourceError> {
        let url = self.url_for(language);
        log::info!("Downloading {} stopwords from {}", language.name(), url);
        let response = ureq::get(&url).call().map_err(|e| ResourceError::Fetch {
            language,
            reason: e.to_string(),
        })?;
        let mut reader = response.into_reader();
        write_atomically(dest, |writer| io::copy(&mut reader, writer).map(|_| ()))
    }
}

/// Which fetcher a store should be built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetcherKind {
    #[default]
    Bundled,
    Http { url_template: Option<String> },
}

impl FetcherKind {
    pub fn build(&self) -> Box<dyn ResourceFetcher> {
        match self {
            FetcherKind::Bundled => Box::new(BundledFetcher),
            FetcherKind::Http { url_template } => Box::new(
                url_template
                    .as_deref()
                    .map(HttpFetcher::new)
                    .unwrap_or_default(),
            ),
        }
    }
}

pub fn default_resource_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wfc")
        .join("resources")
}

/// Lazily loaded, memoized stopword lists.
pub struct StopwordStore {
    dir: PathBuf,
    fetcher: Box<dyn ResourceFetcher>,
    loaded: Mutex<HashMap<Language, Arc<StopwordSet>>>,
}

impl StopwordStore {
    pub fn new(dir: impl Into<PathBuf>, fetcher: Box<dyn ResourceFetcher>) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, language: Language) -> PathBuf {
        self.dir
            .join("stopwords")
            .join(format!("{}.txt", language.name()))
    }

    pub fn stopwords(&self, language: Language) -> Result<Arc<StopwordSet>, ResourceError> {
        let mut loaded = self.loaded.lock();
        if let Some(set) = loaded.get(&language) {
            return Ok(Arc::clone(set));
        }
        let set = Arc::new(self.load_with_retry(language)?);
        log::debug!("Loaded {} {} stopwords", set.len(), language.name());
        loaded.insert(language, Arc::clone(&set));
        Ok(set)
    }

    /// Loads every supported language up front.
    pub fn warm_up(&self) -> Result<(), ResourceError> {
        for language in Language::ALL {
            self.stopwords(language)?;
        }
        Ok(())
    }

    fn load_with_retry(&self, language: Language) -> Result<StopwordSet, ResourceError> {
        let path = self.path_for(language);
        match read_stopwords(&path) {
            Ok(set) => return Ok(set),
            Err(e) => log::info!(
                "{} stopwords unavailable ({}), fetching with the {} fetcher",
                language.name(),
                e,
                self.fetcher.name()
            ),
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ResourceError::io(parent, e))?;
        }
        self.fetcher.fetch(language, &path)?;
        read_stopwords(&path)
    }
}

fn read_stopwords(path: &Path) -> Result<StopwordSet, ResourceError> {
    let contents = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
    let set: StopwordSet = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();
    if set.is_empty() {
        return Err(ResourceError::Empty { path: path.into() });
    }
    Ok(set)
}

// Writes through a `.download` sibling so a failed write never leaves a
// partial list behind.
fn write_atomically<F>(dest: &Path, write: F) -> Result<(), ResourceError>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
{
    let temp_path = dest.with_extension("download");
    let file = fs::File::create(&temp_path).map_err(|e| ResourceError::io(&temp_path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ResourceError::io(&temp_path, e))?;
    fs::rename(&temp_path, dest).map_err(|e| ResourceError::io(dest, e))
}
