//! Tool handler traits.
//!
//! [`ToolDefinition`] is what each tool file implements: a name, a
//! description, a typed parameter struct and an `execute` body. The blanket
//! [`ToolHandler`] impl turns any definition into the object-safe form the
//! registry stores, deriving the input schema from the parameter struct and
//! deserializing raw arguments into it.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::core::error::{Error, Result};

/// A single tool with typed parameters.
#[async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool and return its text body.
    async fn execute(&self, params: Self::Params) -> Result<String>;
}

/// Object-safe handler stored in the registry.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn input_schema(&self) -> Arc<JsonObject>;

    /// Deserialize `arguments` and run the tool.
    async fn invoke(&self, arguments: JsonObject) -> Result<String>;

    /// Tool metadata as advertised to clients.
    fn to_tool(&self) -> Tool {
        Tool {
            name: self.name().into(),
            description: Some(self.description().into()),
            input_schema: self.input_schema(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait]
impl<T: ToolDefinition> ToolHandler for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn description(&self) -> &'static str {
        T::DESCRIPTION
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<T::Params>()
    }

    async fn invoke(&self, arguments: JsonObject) -> Result<String> {
        let params = parse_params::<T::Params>(arguments)?;
        self.execute(params).await
    }
}

/// Deserialize tool arguments, reporting shape problems as validation errors.
pub fn parse_params<P: DeserializeOwned>(arguments: JsonObject) -> Result<P> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| Error::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct GreetParams {
        /// Who to greet.
        name: String,
        #[serde(default)]
        shout: bool,
    }

    struct GreetTool;

    #[async_trait]
    impl ToolDefinition for GreetTool {
        const NAME: &'static str = "greet";
        const DESCRIPTION: &'static str = "Say hello";
        type Params = GreetParams;

        async fn execute(&self, params: GreetParams) -> Result<String> {
            let greeting = format!("Hello, {}", params.name);
            Ok(if params.shout { greeting.to_uppercase() } else { greeting })
        }
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_invoke_parses_params() {
        let out = GreetTool.invoke(args(json!({"name": "Ada", "shout": true}))).await.unwrap();
        assert_eq!(out, "HELLO, ADA");
    }

    #[tokio::test]
    async fn test_missing_required_param_is_validation_error() {
        let err = GreetTool.invoke(args(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_to_tool_carries_schema() {
        let tool = GreetTool.to_tool();
        assert_eq!(tool.name, "greet");
        assert_eq!(tool.description.as_deref(), Some("Say hello"));
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("name").is_some());
    }
}
