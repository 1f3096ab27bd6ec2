//! Model listing capability trait

use crate::error::LlmError;
use crate::registry::{ListedModelRegistry, ModelRegistry};
use async_trait::async_trait;

#[async_trait]
pub trait ModelListingCapability: Send + Sync {
    async fn list_models(&self) -> Result<ListedModelRegistry, LlmError>;

    async fn is_model_available(&self, model_id: &str) -> Result<bool, LlmError> {
        Ok(self.list_models().await?.lookup(model_id).is_some())
    }
}
