//! Engine pool and speed-based engine selection
//!
//! Two engines are loaded once per session: a quick one for short replies
//! and a detailed one for longer replies. Loading happens in parallel and is
//! single-flight: every caller awaits the same initialization.

use super::errors::SessionError;
use crate::llm::{EngineFactory, LLMError, LLMProvider, ModelsConfig, ProgressSink};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Response speed preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speed {
    Quick,
    Detailed,
}

impl Speed {
    /// Generation bound for replies at this speed
    pub fn max_length(&self) -> usize {
        match self {
            Speed::Quick => 128,
            Speed::Detailed => 512,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Speed::Quick => "quick",
            Speed::Detailed => "detailed",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Speed {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(Speed::Quick),
            "detailed" => Ok(Speed::Detailed),
            _ => Err(SessionError::invalid("response speed", s)),
        }
    }
}

/// The two loaded engines
#[derive(Clone)]
pub struct EnginePair {
    pub quick: Arc<dyn LLMProvider>,
    pub detailed: Arc<dyn LLMProvider>,
}

impl EnginePair {
    pub fn get(&self, speed: Speed) -> &Arc<dyn LLMProvider> {
        match speed {
            Speed::Quick => &self.quick,
            Speed::Detailed => &self.detailed,
        }
    }
}

/// Engine chosen for the current turn
#[derive(Clone)]
pub struct ActiveEngine {
    pub speed: Speed,
    pub handle: Arc<dyn LLMProvider>,
    pub max_length: usize,
}

impl fmt::Debug for ActiveEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveEngine")
            .field("speed", &self.speed)
            .field("model", &self.handle.model())
            .field("max_length", &self.max_length)
            .finish()
    }
}

/// Lazily loaded pair of engines shared by a session
pub struct EnginePool {
    factory: Arc<dyn EngineFactory>,
    models: ModelsConfig,
    progress: ProgressSink,
    engines: OnceCell<EnginePair>,
}

impl EnginePool {
    pub fn new(factory: Arc<dyn EngineFactory>, models: ModelsConfig, progress: ProgressSink) -> Self {
        Self { factory, models, progress, engines: OnceCell::new() }
    }

    pub fn is_ready(&self) -> bool {
        self.engines.initialized()
    }

    /// Load both engines, or wait for the load already in flight.
    ///
    /// A failed load leaves the pool empty so the next call tries again.
    pub async fn initialize(&self) -> Result<&EnginePair, LLMError> {
        self.engines
            .get_or_try_init(|| async {
                info!(
                    "Loading engines: quick={} detailed={}",
                    self.models.quick, self.models.detailed
                );

                let (quick, detailed) = tokio::try_join!(
                    self.factory.create(&self.models.quick, self.progress.clone()),
                    self.factory.create(&self.models.detailed, self.progress.clone()),
                )
                .inspect_err(|e| error!("Engine initialization failed: {}", e))?;

                info!("Both engines ready");
                Ok(EnginePair { quick, detailed })
            })
            .await
    }

    /// Bind the engine for `speed`, loading the pair first if needed
    pub async fn select(&self, speed: Speed) -> Result<ActiveEngine, LLMError> {
        let engines = self.initialize().await?;
        Ok(ActiveEngine {
            speed,
            handle: engines.get(speed).clone(),
            max_length: speed.max_length(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockFactory, MockLLMProvider};
    use std::time::Duration;

    fn pool(factory: Arc<MockFactory>) -> EnginePool {
        let models = ModelsConfig { quick: "quick".into(), detailed: "detailed".into() };
        EnginePool::new(factory, models, Arc::new(|_| {}))
    }

    fn factory() -> MockFactory {
        MockFactory::new(vec![MockLLMProvider::new("quick"), MockLLMProvider::new("detailed")])
    }

    #[test]
    fn test_speed_lengths() {
        assert_eq!(Speed::Quick.max_length(), 128);
        assert_eq!(Speed::Detailed.max_length(), 512);
        assert_eq!("Detailed".parse::<Speed>().unwrap(), Speed::Detailed);
        assert!("slow".parse::<Speed>().is_err());
    }

    #[tokio::test]
    async fn test_select_binds_matching_engine() {
        let factory = Arc::new(factory());
        let pool = pool(factory.clone());

        let quick = pool.select(Speed::Quick).await.unwrap();
        assert_eq!(quick.handle.model(), "quick");
        assert_eq!(quick.max_length, 128);

        let detailed = pool.select(Speed::Detailed).await.unwrap();
        assert_eq!(detailed.handle.model(), "detailed");
        assert_eq!(detailed.max_length, 512);

        assert_eq!(factory.created(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_initialization_is_single_flight() {
        let factory = Arc::new(factory().with_delay(Duration::from_millis(20)));
        let pool = pool(factory.clone());

        let (a, b) = tokio::join!(pool.initialize(), pool.initialize());
        assert!(a.is_ok() && b.is_ok());
        assert!(pool.is_ready());
        assert_eq!(factory.created(), 2);
    }

    #[tokio::test]
    async fn test_failed_initialization_can_retry() {
        let factory = Arc::new(factory().failing(1));
        let pool = pool(factory.clone());

        assert!(pool.initialize().await.is_err());
        assert!(!pool.is_ready());

        assert!(pool.initialize().await.is_ok());
        assert!(pool.is_ready());
    }
}
