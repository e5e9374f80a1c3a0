//! HTTP access to the per-step graph endpoint.

use gloo_net::http::Request;
use thiserror::Error;

use super::navigation::Cursor;
use super::response::GraphResponse;

/// Why a step could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
	/// The request never produced a response, or its body could not be read.
	#[error("request failed: {0}")]
	Network(String),
	/// The endpoint answered outside the 2xx range.
	#[error("{url} answered with HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Requested URL.
		url: String,
	},
	/// The body is not a graph document.
	#[error("malformed graph document: {0}")]
	Decode(String),
}

/// `<base>/<step>`; an empty base targets the page's own origin.
pub fn step_url(base: &str, cursor: Cursor) -> String {
	format!("{}/{}", base.trim_end_matches('/'), cursor)
}

fn check_status(status: u16, url: &str) -> Result<(), ClientError> {
	if (200..300).contains(&status) {
		Ok(())
	} else {
		Err(ClientError::Status {
			status,
			url: url.to_string(),
		})
	}
}

fn decode(body: &str) -> Result<GraphResponse, ClientError> {
	GraphResponse::from_json(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// `GET` one step and decode it.
pub async fn fetch_graph(url: &str) -> Result<GraphResponse, ClientError> {
	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| ClientError::Network(e.to_string()))?;
	check_status(response.status(), url)?;

	let body = response
		.text()
		.await
		.map_err(|e| ClientError::Network(e.to_string()))?;
	decode(&body)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn step_url_is_base_slash_cursor() {
		assert_eq!(step_url("", Cursor(0)), "/0");
		assert_eq!(step_url("", Cursor(17)), "/17");
		assert_eq!(step_url("http://localhost:8000", Cursor(3)), "http://localhost:8000/3");
		assert_eq!(step_url("http://localhost:8000/", Cursor(3)), "http://localhost:8000/3");
	}

	#[test]
	fn non_2xx_is_a_status_error() {
		assert_eq!(check_status(200, "/0"), Ok(()));
		assert_eq!(check_status(204, "/0"), Ok(()));
		for status in [199, 301, 404, 500] {
			assert_eq!(
				check_status(status, "/7"),
				Err(ClientError::Status {
					status,
					url: "/7".into()
				})
			);
		}
	}

	#[test]
	fn bad_bodies_are_decode_errors() {
		for body in ["", "not json", r#"{"a": ["A"]}"#, "[]"] {
			assert!(
				matches!(decode(body), Err(ClientError::Decode(_))),
				"{body:?}"
			);
		}
		let ok = decode(r#"{"a": ["A", 0, [], 0, "red"]}"#).unwrap();
		assert_eq!(ok.nodes["a"].label, "A");
	}

	#[test]
	fn errors_read_well() {
		let err = ClientError::Status {
			status: 404,
			url: "/9".into(),
		};
		assert_eq!(err.to_string(), "/9 answered with HTTP 404");
		assert_eq!(
			ClientError::Decode("expected `,`".into()).to_string(),
			"malformed graph document: expected `,`"
		);
	}
}
