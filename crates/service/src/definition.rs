//! The orchestrator: validation → permissions → execution chain → lifecycle hooks.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info_span, Instrument};
use validation::{BuiltinEngine, RuleEngine, Validator};

use crate::cache::{DefinitionId, ValidatorCache};
use crate::chain::{Next, Wrap};
use crate::context::{InvocationState, RunContext};
use crate::errors::ConfigurationError;
use crate::lifecycle;
use crate::service::Service;
use crate::validate as phase;

/// Why the phase sequence stopped early.
enum Halt<E> {
    /// Bypasses `on_error`.
    Configuration(ConfigurationError),
    Phase(E),
}

/// Everything shared by all invocations of one service type: its wrap layers,
/// the validator cache it reads from and the rule engine used to fill it.
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
/// use service::{ConfigurationError, Service, ServiceDefinition, ServiceError};
///
/// #[derive(Debug, thiserror::Error)]
/// enum AppError {
///     #[error(transparent)] Service(#[from] ServiceError),
///     #[error(transparent)] Config(#[from] ConfigurationError),
/// }
///
/// struct Greet;
///
/// #[async_trait]
/// impl Service for Greet {
///     type Output = String;
///     type Error = AppError;
///
///     fn validation_rules() -> Option<Value> {
///         Some(json!({"name": ["required", "trim"]}))
///     }
///
///     async fn check_permissions(&self, _clean: &Value) -> Result<(), AppError> { Ok(()) }
///
///     async fn execute(&self, clean: Value) -> Result<String, AppError> {
///         Ok(format!("hello, {}", clean["name"].as_str().unwrap_or_default()))
///     }
/// }
///
/// let definition = ServiceDefinition::<Greet>::new();
/// let greeting = tokio_test::block_on(definition.run(Greet, json!({"name": " Ann "}))).unwrap();
/// assert_eq!(greeting, "hello, Ann");
/// ```
pub struct ServiceDefinition<S: Service> {
    id: DefinitionId,
    layers: Vec<Arc<dyn Wrap<S>>>,
    cache: Arc<ValidatorCache>,
    engine: Arc<dyn RuleEngine>,
    _service: PhantomData<fn() -> S>,
}

impl<S: Service> ServiceDefinition<S> {
    pub fn new() -> Self {
        Self {
            id: DefinitionId::of::<S>(),
            layers: Vec::new(),
            cache: ValidatorCache::global(),
            engine: Arc::new(BuiltinEngine),
            _service: PhantomData,
        }
    }

    /// Use a private cache instead of the process-wide one.
    pub fn with_cache(mut self, cache: Arc<ValidatorCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Compile rules with `engine` instead of the built-in one.
    ///
    /// Cache slots are keyed by service type only, so this also gives the definition a
    /// fresh private cache. A cache supplied later through `with_cache` is used as-is and
    /// must only ever be filled by the same engine.
    pub fn with_engine(mut self, engine: Arc<dyn RuleEngine>) -> Self {
        self.engine = engine;
        self.cache = Arc::new(ValidatorCache::new());
        self
    }

    /// Register a wrap layer. Each new layer wraps all previously registered ones.
    pub fn layer<W: Wrap<S> + 'static>(self, layer: W) -> Self {
        self.layer_arc(Arc::new(layer))
    }

    pub fn layer_arc(mut self, layer: Arc<dyn Wrap<S>>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn id(&self) -> DefinitionId {
        self.id
    }

    /// Layer names from outermost to innermost.
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().rev().map(|layer| layer.name()).collect()
    }

    /// The cached validator for this definition, built on first use.
    pub fn validator(&self) -> Result<Option<Arc<dyn Validator>>, ConfigurationError> {
        self.cache.get_or_build(self.id, self.engine.as_ref(), S::validation_rules)
    }

    /// Validation phase on its own.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Value, S::Error> {
        let validator = self.validator()?;
        Ok(phase::validate(validator.as_deref(), raw)?)
    }

    /// Fresh, uncached validation against `rules` using this definition's engine.
    pub fn validate_with_rules(&self, data: &Value, rules: &Value) -> Result<Value, S::Error> {
        phase::validate_with_rules_in(self.engine.as_ref(), data, rules)
    }

    /// Run one invocation. `None` and `Value::Null` both mean "no input".
    pub async fn run(&self, service: S, input: impl Into<Option<Value>>) -> Result<S::Output, S::Error> {
        self.run_with_context(service, input).await.0
    }

    /// Like [`ServiceDefinition::run`], also returning the final context.
    pub async fn run_with_context(
        &self,
        service: S,
        input: impl Into<Option<Value>>,
    ) -> (Result<S::Output, S::Error>, RunContext) {
        let mut ctx = RunContext::start(self.id.name(), input.into());
        let span = info_span!(
            "service_run",
            service = self.id.name(),
            invocation_id = %ctx.invocation_id(),
        );

        let result = async {
            let outcome = match self.drive(&service, &mut ctx).await {
                Ok(output) => Ok(output),
                Err(Halt::Phase(err)) => Err(err),
                Err(Halt::Configuration(err)) => {
                    error!(event = "misconfigured", error = %err, "service definition is misconfigured");
                    return Err(S::Error::from(err));
                }
            };
            lifecycle::notify(&service, outcome, &ctx).await
        }
        .instrument(span)
        .await;

        (result, ctx)
    }

    async fn drive(&self, service: &S, ctx: &mut RunContext) -> Result<S::Output, Halt<S::Error>> {
        ctx.advance(InvocationState::Validating);
        let validator = match self.validator() {
            Ok(validator) => validator,
            Err(err) => {
                ctx.advance(InvocationState::Misconfigured);
                return Err(Halt::Configuration(err));
            }
        };
        let clean = match phase::validate(validator.as_deref(), ctx.input_data()) {
            Ok(clean) => clean,
            Err(err) => {
                ctx.advance(InvocationState::ValidationFailed);
                return Err(Halt::Phase(err.into()));
            }
        };
        ctx.set_clean_data(clean.clone());
        ctx.advance(InvocationState::Validated);

        ctx.advance(InvocationState::CheckingPermissions);
        if let Err(err) = service.check_permissions(&clean).await {
            debug!(error = %err, "permission check denied the invocation");
            ctx.advance(InvocationState::Denied);
            return Err(Halt::Phase(err));
        }
        ctx.advance(InvocationState::Authorized);

        ctx.advance(InvocationState::Executing);
        debug!(layers = self.layers.len(), "entering execution chain");
        match Next::new(&self.layers, service).proceed(clean).await {
            Ok(output) => {
                ctx.complete();
                Ok(output)
            }
            Err(err) => {
                ctx.advance(InvocationState::ExecutionFailed);
                Err(Halt::Phase(err))
            }
        }
    }
}

impl<S: Service> Default for ServiceDefinition<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Service> fmt::Debug for ServiceDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("id", &self.id)
            .field("layers", &self.layer_names())
            .finish()
    }
}
