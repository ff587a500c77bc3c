use crate::error::Result;
use crate::model::Model;

/// Common interface for model text encodings
pub trait ModelFormat: Send + Sync {
    /// Decode a model from its text form
    ///
    /// # Arguments
    /// * `input` - The encoded model
    ///
    /// # Returns
    /// The decoded model, or the first error found in the input
    fn read(&self, input: &str) -> Result<Model>;

    /// Encode a model; nothing is returned if the model is not representable
    fn write(&self, model: &Model) -> Result<String>;

    /// Get the format name for logging/debugging
    fn name(&self) -> &str;

    /// MIME type of the encoded text
    fn content_type(&self) -> &str;
}
