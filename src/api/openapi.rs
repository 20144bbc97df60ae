//! OpenAPI document generated from the loaded endpoints.

use utoipa::openapi::{
    path::{HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn},
    response::ResponseBuilder,
    schema::{ObjectBuilder, Schema, Type},
    InfoBuilder, OpenApi, OpenApiBuilder, PathItem, PathsBuilder, RefOr, Required,
};

use crate::handler::HandlerKind;
use crate::loader::Endpoint;
use crate::source::{FieldType, SchemaField};

/// Build an OpenAPI document with one GET operation per endpoint.
///
/// Queryable endpoints declare one optional query parameter per filter
/// field. Fields that cannot be bound from a query string are omitted.
pub fn build_openapi(endpoints: &[Endpoint], prefix: &str) -> OpenApi {
    let mut paths = PathsBuilder::new();

    for endpoint in endpoints {
        let parameters: Vec<Parameter> = endpoint
            .handler
            .schema()
            .map(|schema| {
                schema
                    .fields()
                    .iter()
                    .filter(|field| field.kind.is_bindable())
                    .map(query_parameter)
                    .collect()
            })
            .unwrap_or_default();

        let description = match endpoint.handler.kind() {
            HandlerKind::Queryable => "Records matching every supplied field",
            HandlerKind::Opaque => "File contents",
            HandlerKind::DecodeFailure => "Description of the decode failure",
        };

        let operation = OperationBuilder::new()
            .operation_id(Some(endpoint.name()))
            .summary(Some(format!("Contents of {}", endpoint.file.display())))
            .parameters(Some(parameters))
            .response(
                "200",
                RefOr::T(ResponseBuilder::new().description(description).build()),
            )
            .build();

        paths = paths.path(
            format!("{prefix}{}", endpoint.route),
            PathItem::new(HttpMethod::Get, operation),
        );
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(env!("CARGO_PKG_NAME"))
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .build()
}

fn query_parameter(field: &SchemaField) -> Parameter {
    let schema_type = match field.kind {
        FieldType::Boolean => Type::Boolean,
        FieldType::Integer => Type::Integer,
        FieldType::Float => Type::Number,
        _ => Type::String,
    };

    ParameterBuilder::new()
        .name(&field.name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .schema(Some(RefOr::T(Schema::Object(
            ObjectBuilder::new().schema_type(schema_type).build(),
        ))))
        .build()
}
