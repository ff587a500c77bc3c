use mps_api_sdk::{LinearConstraint, ModelBuilder, MpsClient, Variable};

const SAMPLE: &str = "\
NAME          sample
ROWS
 N  COST
 L  cap
COLUMNS
    x       COST        -1  cap          2
    y       COST        -2  cap          3
RHS
    RHS     cap        100
ENDATA
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = MpsClient::new("http://127.0.0.1:9000")?;

    if !client.health_check().await? {
        eprintln!("✗ Server is not healthy");
        return Ok(());
    }
    println!("✓ Server is healthy");

    // MPS text to model
    let model = client.mps_to_model(SAMPLE).await?;
    println!("\nParsed model `{}`:", model.name);
    for variable in &model.variables {
        println!("  {} in [{}, {}]", variable.name, variable.lower, variable.upper);
    }
    for constraint in &model.linear_constraints {
        println!(
            "  {}: {} <= {:?} <= {}",
            constraint.name, constraint.lower, constraint.coefficients, constraint.upper
        );
    }

    // Model to MPS text
    let model = ModelBuilder::new("built")
        .add_variable(Variable::integer("a", 0.0, 5.0))
        .add_variable(Variable::continuous("b", f64::NEG_INFINITY, f64::INFINITY))
        .add_constraint(
            LinearConstraint::new("band", 1.0, 4.0)
                .with_term("a", 1.0)
                .with_term("b", -1.0),
        )
        .minimize([("a", 1.0), ("b", 0.5)])
        .build()?;

    let mps = client.model_to_mps(&model).await?;
    println!("\nSerialized model:\n{}", mps);

    Ok(())
}
