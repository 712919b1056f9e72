use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::services::artwork::FetchError;

/// 响应体字节流
pub type ByteStream = BoxStream<'static, Result<Bytes, FetchError>>;

/// HTTP 请求参数
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// HTTP 响应（状态码 + 流式响应体）
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ByteStream,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// 读取完整响应体，取消时立即中止
    pub async fn collect(mut self, cancel: &CancellationToken) -> Result<Bytes, FetchError> {
        let mut buffer = BytesMut::new();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                chunk = self.body.next() => chunk,
            };

            match chunk {
                Some(chunk) => buffer.extend_from_slice(&chunk?),
                None => break,
            }
        }

        Ok(buffer.freeze())
    }
}

/// 通用 HTTP 客户端能力
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// 发送 GET 请求，取消令牌触发时中止请求并返回 `FetchError::Cancelled`
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, FetchError>;
}

/// 基于 reqwest 的实现
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, FetchError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // 丢弃 send future 即中止进行中的请求
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = builder.send() => response?,
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(FetchError::from))
            .boxed();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用的 HTTP 客户端桩

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 预设响应
    #[derive(Debug, Clone)]
    pub enum StubReply {
        Status(u16, &'static str),
        Fail(&'static str),
        /// 永不返回，用于验证取消
        Hang,
    }

    /// 记录请求并按顺序返回预设响应，响应用尽后返回最后一个
    #[derive(Default)]
    pub struct StubHttpClient {
        replies: Mutex<VecDeque<StubReply>>,
        requests: Mutex<Vec<String>>,
    }

    impl StubHttpClient {
        pub fn with_replies(replies: Vec<StubReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for StubHttpClient {
        async fn send(
            &self,
            request: HttpRequest,
            cancel: &CancellationToken,
        ) -> Result<HttpResponse, FetchError> {
            self.requests.lock().unwrap().push(request.url);

            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.len() > 1 {
                    replies.pop_front()
                } else {
                    replies.front().cloned()
                }
            };

            match reply {
                Some(StubReply::Status(status, body)) => Ok(HttpResponse {
                    status,
                    content_type: Some("application/json".to_string()),
                    body: futures_util::stream::once(async move {
                        Ok(Bytes::from_static(body.as_bytes()))
                    })
                    .boxed(),
                }),
                Some(StubReply::Fail(message)) => Err(FetchError::NetworkError(message.to_string())),
                Some(StubReply::Hang) => {
                    cancel.cancelled().await;
                    Err(FetchError::Cancelled)
                }
                None => Err(FetchError::NetworkError("no stub reply".to_string())),
            }
        }
    }
}
