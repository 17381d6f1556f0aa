use super::auth::SessionRevocations;
use atelier_database::Database;
use atelier_domain::config::ApiConfig;
use atelier_domain::registry::{FeatureSlice, InitializedSlice};
use atelier_event_bus::EventBus;
use axum::extract::FromRef;
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[atelier_derive::atelier_error]
pub enum ApiStateError {
    /// The builder was finalized without a mandatory component.
    #[error("API state incomplete{}: {message}", format_context(.context))]
    Incomplete { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A handler asked for a slice that never registered.
    #[error("Unknown feature slice{}: {message}", format_context(.context))]
    UnknownSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Everything the request path can reach, shared behind one [`Arc`].
#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub database: Database,
    pub events: EventBus,
    pub revocations: SessionRevocations,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Process-wide server state handed to every route.
///
/// Cloning is cheap. Handlers extract the piece they need via `FromRef`
/// (`State<Database>`, `State<ApiConfig>`, ...) instead of taking the whole
/// state.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    /// Looks up a registered feature slice by its concrete type.
    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        let initialized = self.inner.slices.get(&TypeId::of::<T>())?;
        initialized.state.as_any().downcast_ref::<T>()
    }

    /// Like [`ApiState::get_slice`], but a missing registration is an error.
    ///
    /// # Errors
    /// [`ApiStateError::UnknownSlice`] when the slice never registered,
    /// e.g. because its feature toggle is off.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>().ok_or_else(|| ApiStateError::UnknownSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// Type ids of every registered slice, for diagnostics.
    pub fn slice_ids(&self) -> impl Iterator<Item = &TypeId> {
        self.inner.slices.keys()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

macro_rules! from_ref {
    ($field:ident: $ty:ty) => {
        impl FromRef<ApiState> for $ty {
            fn from_ref(state: &ApiState) -> Self {
                state.inner.$field.clone()
            }
        }
    };
}

from_ref!(config: ApiConfig);
from_ref!(database: Database);
from_ref!(events: EventBus);
from_ref!(revocations: SessionRevocations);

/// Assembles an [`ApiState`] once config, database, and slices exist.
#[must_use = "nothing is assembled until build() runs"]
#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    database: Option<Database>,
    events: Option<EventBus>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl ApiStateBuilder {
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Bus shared with background workers. A fresh bus is created when the
    /// host never provides one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Registers one initialized slice; registering the same type again
    /// replaces the earlier entry.
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    /// Registers every slice the bootstrap produced.
    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        self.slices.extend(slices.into_iter().map(|slice| (slice.id, slice)));
        self
    }

    /// # Errors
    /// [`ApiStateError::Incomplete`] when `config()` or `db()` was never
    /// called.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let Self { config, database, events, slices } = self;

        let config = config.ok_or_else(|| missing("config()"))?;
        let database = database.ok_or_else(|| missing("db()"))?;
        let revocations = SessionRevocations::from_config(&config.security.identity);

        Ok(ApiState {
            inner: Arc::new(ApiStateInner {
                config,
                database,
                events: events.unwrap_or_default(),
                revocations,
                slices,
            }),
        })
    }
}

fn missing(setter: &'static str) -> ApiStateError {
    ApiStateError::Incomplete {
        message: format!("{setter} was never called").into(),
        context: None,
    }
}
