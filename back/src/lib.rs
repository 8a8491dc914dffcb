pub mod v1;

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::Router;
use serde::{Deserialize, Serialize};
use todos_api::v1::Todo;
use tokio::{net::TcpListener, sync::Mutex};
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 7890;
pub const DEFAULT_DATA_FILE: &str = "data.ron";

/// Build the full application router around `state`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new().nest("/api", v1::router()).with_state(state)
}

/// Serve plain HTTP on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> io::Result<()> {
    axum::serve(listener, app(state)).await
}

#[derive(Debug)]
pub struct AppState {
    pub data_file: Option<PathBuf>,
    pub todos: Mutex<HashMap<Uuid, Todo>>,
}

impl AppState {
    /// State that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            data_file: None,
            todos: Mutex::default(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();

        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no data file, starting empty");
                return Ok(Self::empty(path));
            }
            Err(err) => eyre::bail!(err),
        };
        let data: DataOwned = ron::de::from_reader(file)?;

        match data {
            DataOwned::V1 { todos } => Ok(Self::from_v1(path, todos)),
        }
    }

    fn empty(path: &Path) -> Self {
        Self::from_v1(path, HashMap::new())
    }

    fn from_v1(path: &Path, todos: HashMap<Uuid, Todo>) -> Self {
        Self {
            data_file: Some(path.to_path_buf()),
            todos: Mutex::new(todos),
        }
    }

    pub async fn store(&self) -> eyre::Result<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        let todos = self.todos.lock().await;
        let data = DataBorrowed::V1 { todos: &todos };

        let file = fs::File::create(path)?;
        let mut ron = ron::Serializer::new(file, Some(Default::default()))?;
        data.serialize(&mut ron)?;

        tracing::debug!(path = %path.display(), count = todos.len(), "stored todos");

        Ok(())
    }
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { todos: &'a HashMap<Uuid, Todo> },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { todos: HashMap<Uuid, Todo> },
}
