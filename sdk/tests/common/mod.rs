//! In-memory transport that records every request and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ludiks::{HttpRequest, HttpResponse, HttpTransport, LudiksError};

#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; with an empty queue every request gets `200 {}`.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a connection failure.
    pub fn fail(&self, reason: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> serde_json::Value {
        let requests = self.requests();
        let body = requests
            .last()
            .and_then(|r| r.body.as_deref())
            .expect("no request body recorded");
        serde_json::from_str(body).unwrap()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LudiksError> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(LudiksError::Transport(reason)),
            None => Ok(HttpResponse::new(200, "{}")),
        }
    }
}

pub fn track_response_json() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "updated": true,
        "message": "Step completed",
        "stepCompleted": true,
        "circuitCompleted": false,
        "alreadyCompleted": false,
        "points": 25,
        "rewards": [{"name": "Early bird"}]
    })
}

pub fn profile_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "metadata": {"plan": "pro"},
        "progressions": [{
            "id": "c1",
            "name": "Onboarding",
            "type": "points",
            "points": 10,
            "status": "in_progress",
            "startDate": "2025-01-01T00:00:00.000Z",
            "completedAt": null,
            "stepProgressions": [{
                "id": "s1",
                "name": "First lesson",
                "points": 10,
                "status": "completed",
                "completedAt": "2025-01-02T00:00:00.000Z",
                "completionThreshold": 1
            }]
        }],
        "rewards": [{
            "id": "r1",
            "name": "Early bird",
            "description": "Finished a lesson",
            "obtainedAt": "2025-01-02T00:00:00.000Z",
            "stepId": "s1",
            "circuitId": "c1",
            "circuitName": "Onboarding"
        }],
        "currentStreak": 2,
        "longestStreak": 5,
        "createdAt": "2025-01-01T00:00:00.000Z",
        "lastLogin": "2025-01-03T00:00:00.000Z"
    })
}
