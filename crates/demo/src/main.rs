use retail_demo::config::DemoConfig;
use retail_demo::walkthrough;

fn main() -> anyhow::Result<()> {
    let config = DemoConfig::from_env();
    retail_observability::init(config.log_format);

    let report = walkthrough::run(&config)?;
    for line in &report.catalog {
        println!("{line}");
    }
    println!("{}", serde_json::to_string_pretty(&report.ordered)?);
    println!("stock left: {}", report.stock_left);
    if report.second_commit_rejected {
        println!("order failed successfully");
    } else {
        println!("order did not fail");
    }
    Ok(())
}
