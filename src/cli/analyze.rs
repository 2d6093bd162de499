//! Analyze command implementation

use crate::cli::serve::load_config_file;
use crate::cli::AnalyzeArgs;
use crate::pipeline::Analyzer;
use serde_json::{json, Value};

/// Request body equivalent to the command-line target.
pub fn request_body(args: &AnalyzeArgs) -> Value {
    if let Some(ref disease) = args.disease {
        json!({ "type": "treatments", "disease": disease })
    } else if args.trending {
        json!({ "type": "trending" })
    } else {
        json!({ "type": "diseases", "symptoms": args.symptoms })
    }
}

/// Handle `symcheck analyze` command
///
/// Runs the same pipeline as `POST /api/analyze` without rate limiting and
/// returns the JSON result.
pub async fn handle_analyze(args: &AnalyzeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_file(&args.config)?;
    config.validate()?;

    let analyzer = Analyzer::from_config(&config)?;
    let analysis = analyzer.analyze(&request_body(args), None).await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&analysis.result)?
    } else {
        serde_json::to_string(&analysis.result)?
    };
    Ok(output)
}
