use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{FetchError, Fetcher};

/// A scripted reply for one request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Ok(Vec<u8>),
    Status(u16),
    NetworkError,
}

/// Fake network: each URL has a queue of replies consumed in order.
///
/// Once a URL's queue is down to a single reply that reply is repeated.
/// Unknown URLs fail with a network error. Every request is logged so tests
/// can assert which URLs were (not) fetched.
pub struct MockFetcher {
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(self, url: &str, responses: Vec<MockResponse>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn next(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let mut responses = self.responses.lock().unwrap();
        let reply = match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(MockResponse::Ok(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
            Some(MockResponse::NetworkError) | None => {
                Err(FetchError::Network(format!("no route to {url}")))
            }
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.next(url)
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.next(url)
    }
}
