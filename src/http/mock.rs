// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory transport for unit tests

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use super::request::Request;
use super::transport::{BodyStream, Transport, TransportResponse};
use crate::error::{Error, Result};

type Scripted = Result<(u16, HeaderMap, String)>;

/// Replays queued responses and records what was sent
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        self.responses
            .lock()
            .push_back(Ok((status, map, body.to_string())));
    }

    pub(crate) fn fail(&self, message: &str) {
        self.fail_with(Error::other(message));
    }

    pub(crate) fn fail_with(&self, error: Error) {
        self.responses.lock().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse> {
        let url = request.url.clone();
        self.requests.lock().push(request);

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok((status, headers, body))) => Ok(TransportResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers,
                url,
                body: BodyStream::from_bytes(body),
            }),
            Some(Err(error)) => Err(error),
            None => Err(Error::other("no scripted response left")),
        }
    }
}
