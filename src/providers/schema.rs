//! Declared response shapes
//!
//! A [`ResponseShape`] describes the JSON the hosted model must return. It is
//! provider neutral and renders to the two dialects the providers speak:
//! Gemini's OpenAPI-style `responseSchema` and plain JSON Schema for Ollama.

use serde_json::{json, Map, Value};

/// Type of a shape node
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    String,
    Number,
    Boolean,
    Array(Box<ResponseShape>),
    /// Properties in declaration order
    Object(Vec<(String, ResponseShape)>),
}

/// One node of a declared response shape
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseShape {
    pub kind: ShapeKind,
    /// Natural-language hint shown to the model
    pub description: Option<String>,
    pub nullable: bool,
}

impl ResponseShape {
    fn of(kind: ShapeKind) -> Self {
        Self {
            kind,
            description: None,
            nullable: false,
        }
    }

    pub fn string() -> Self {
        Self::of(ShapeKind::String)
    }

    pub fn number() -> Self {
        Self::of(ShapeKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(ShapeKind::Boolean)
    }

    pub fn array(items: ResponseShape) -> Self {
        Self::of(ShapeKind::Array(Box::new(items)))
    }

    /// Object with properties in the given order
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::providers::ResponseShape;
    ///
    /// let shape = ResponseShape::object(vec![
    ///     ("title", ResponseShape::string().describe("A catchy title")),
    ///     ("stops", ResponseShape::array(ResponseShape::string())),
    /// ]);
    /// assert!(shape.field("title").is_some());
    /// assert!(shape.field("missing").is_none());
    /// ```
    pub fn object<K: Into<String>>(properties: Vec<(K, ResponseShape)>) -> Self {
        Self::of(ShapeKind::Object(
            properties
                .into_iter()
                .map(|(name, shape)| (name.into(), shape))
                .collect(),
        ))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Looks up a property of an object shape
    pub fn field(&self, name: &str) -> Option<&ResponseShape> {
        match &self.kind {
            ShapeKind::Object(properties) => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, shape)| shape),
            _ => None,
        }
    }

    /// Renders the shape as a Gemini `responseSchema`
    pub fn to_gemini_schema(&self) -> Value {
        let mut schema = Map::new();
        let type_name = match &self.kind {
            ShapeKind::String => "STRING",
            ShapeKind::Number => "NUMBER",
            ShapeKind::Boolean => "BOOLEAN",
            ShapeKind::Array(items) => {
                schema.insert("items".to_string(), items.to_gemini_schema());
                "ARRAY"
            }
            ShapeKind::Object(properties) => {
                let mut props = Map::new();
                for (name, shape) in properties {
                    props.insert(name.clone(), shape.to_gemini_schema());
                }
                schema.insert("properties".to_string(), Value::Object(props));
                schema.insert(
                    "propertyOrdering".to_string(),
                    json!(properties.iter().map(|(n, _)| n).collect::<Vec<_>>()),
                );
                "OBJECT"
            }
        };
        schema.insert("type".to_string(), json!(type_name));
        if let Some(description) = &self.description {
            schema.insert("description".to_string(), json!(description));
        }
        if self.nullable {
            schema.insert("nullable".to_string(), json!(true));
        }
        Value::Object(schema)
    }

    /// Renders the shape as JSON Schema
    pub fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        let type_name = match &self.kind {
            ShapeKind::String => "string",
            ShapeKind::Number => "number",
            ShapeKind::Boolean => "boolean",
            ShapeKind::Array(items) => {
                schema.insert("items".to_string(), items.to_json_schema());
                "array"
            }
            ShapeKind::Object(properties) => {
                let mut props = Map::new();
                for (name, shape) in properties {
                    props.insert(name.clone(), shape.to_json_schema());
                }
                schema.insert("properties".to_string(), Value::Object(props));
                "object"
            }
        };
        let type_value = if self.nullable {
            json!([type_name, "null"])
        } else {
            json!(type_name)
        };
        schema.insert("type".to_string(), type_value);
        if let Some(description) = &self.description {
            schema.insert("description".to_string(), json!(description));
        }
        Value::Object(schema)
    }
}
