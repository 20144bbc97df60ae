//! Data directory walking and endpoint construction.

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::LoadError;
use crate::handler::{create_error_handler, create_handler, Handler, HandlerKind};
use crate::source::SchemaField;

/// Characters escaped when a file name becomes a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A handler bound to the route derived from its source file.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// URL path, e.g. `/users/admins`.
    pub route: String,
    /// Source file the data came from.
    pub file: PathBuf,
    /// Request handler.
    pub handler: Handler,
}

impl Endpoint {
    /// Handler name.
    pub fn name(&self) -> &str {
        self.handler.name()
    }

    /// Public description used by the index and OpenAPI routes.
    pub fn summary(&self) -> EndpointSummary {
        EndpointSummary {
            route: self.route.clone(),
            name: self.name().to_string(),
            kind: self.handler.kind(),
            fields: self
                .handler
                .schema()
                .map(|schema| schema.fields().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Serializable description of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    /// URL path.
    pub route: String,
    /// Handler name.
    pub name: String,
    /// Handler variant.
    pub kind: HandlerKind,
    /// Filterable fields; empty unless the endpoint is queryable.
    pub fields: Vec<SchemaField>,
}

/// Load every `*.json` file under `dir` as an endpoint.
///
/// Files are visited in sorted order. Hidden entries and non-JSON files are
/// skipped, as are paths with a segment starting with `:` or `*`, which the
/// router would read as a capture. Route segments are percent-encoded. A file
/// that fails to decode, including one that is not UTF-8, is served as an
/// error payload rather than aborting the load.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_endpoints(dir: &Path) -> Result<Vec<Endpoint>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_json_files(dir, &mut files)?;

    let mut endpoints = Vec::with_capacity(files.len());

    for file in files {
        let relative = file.strip_prefix(dir).unwrap_or(&file);
        let segments = route_segments(relative);
        if segments
            .iter()
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
        {
            warn!("{} would be a route capture, skipping", file.display());
            continue;
        }
        let route = encode_route(&segments);
        let name = segments.join("_");

        let bytes = fs::read(&file).map_err(|source| LoadError::Io {
            path: file.clone(),
            source,
        })?;
        let file_name = relative.to_string_lossy();

        let handler = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => create_handler(value, Some(&name)),
            Err(e) => {
                warn!("{} is not valid JSON: {}", file.display(), e);
                create_error_handler(&e, &file_name, Some(&name))
            }
        };

        info!(
            route = %route,
            name = %handler.name(),
            kind = %handler.kind(),
            "Registered endpoint"
        );

        endpoints.push(Endpoint {
            route,
            file,
            handler,
        });
    }

    Ok(endpoints)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    entries.sort();

    for path in entries {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        } else {
            debug!("Skipping non-JSON file {}", path.display());
        }
    }

    Ok(())
}

fn route_segments(relative: &Path) -> Vec<String> {
    let stem = relative.with_extension("");
    stem.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

fn encode_route(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", utf8_percent_encode(segment, PATH_SEGMENT)))
        .collect()
}
