use log::debug;

use crate::domain::format::ModelFormat;
use crate::error::Result;

/// Read `input` with one format and write the model with another.
pub fn convert(input: &str, from: &dyn ModelFormat, to: &dyn ModelFormat) -> Result<String> {
    let model = from.read(input)?;
    debug!(
        "converting model `{}` from {} to {}: {} variables, {} constraints",
        model.name,
        from.name(),
        to.name(),
        model.num_variables(),
        model.num_constraints()
    );
    to.write(&model)
}
