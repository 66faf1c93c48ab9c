//! HTTP ingestion server
//!
//! One connection at a time. Each request is parsed, validated and handed
//! to the app task; the response is sent and the connection closed.

use defmt::*;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Write as _;

use marquee_core::data::{parse_document, parse_set_time};
use marquee_protocol::{Request, RequestParser, Route, Status};

use crate::channels::{Inbound, Query, INBOUND, REPLY};

/// Socket buffer sizes
const RX_BUFFER_SIZE: usize = 1024;
const TX_BUFFER_SIZE: usize = 1024;

/// Idle time before a client is dropped
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed for the app task to answer a query
const QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// A response ready to be written
struct Response {
    status: Status,
    content_type: &'static str,
    body: Body,
}

enum Body {
    Reason,
    Json(alloc::vec::Vec<u8>),
}

impl Response {
    fn status(status: Status) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Body::Reason,
        }
    }

    fn json(bytes: alloc::vec::Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            content_type: "application/json",
            body: Body::Json(bytes),
        }
    }

    fn body(&self) -> &[u8] {
        match &self.body {
            Body::Reason => self.status.reason().as_bytes(),
            Body::Json(bytes) => bytes,
        }
    }
}

/// HTTP server task
#[embassy_executor::task]
pub async fn http_task(stack: Stack<'static>, port: u16) -> ! {
    info!("HTTP task started");
    stack.wait_config_up().await;

    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut chunk = [0u8; 256];
    let mut parser = RequestParser::new();

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        debug!("Listening on port {}", port);
        if let Err(e) = socket.accept(port).await {
            warn!("accept error: {:?}", e);
            Timer::after_millis(500).await;
            continue;
        }

        parser.reset();
        let parsed = loop {
            match socket.read(&mut chunk).await {
                Ok(0) => break None,
                Ok(n) => match parser.feed_bytes(&chunk[..n]) {
                    Ok(Some(request)) => break Some(Ok(request)),
                    Ok(None) => continue,
                    Err(e) => break Some(Err(e)),
                },
                Err(e) => {
                    warn!("read error: {:?}", e);
                    break None;
                }
            }
        };

        let mut reboot = false;
        let response = match parsed {
            Some(Ok(request)) => {
                let route = Route::resolve(request.head.method, &request.head.path);
                info!("{} {} -> {}", request.head.method, request.head.path.as_str(), route);
                reboot = route == Route::Reboot;
                handle(route, &request).await
            }
            Some(Err(e)) => {
                warn!("bad request: {:?}", e);
                Response::status(Status::from(e))
            }
            None => {
                socket.close();
                continue;
            }
        };

        let body = response.body();
        let head = response.status.response_head(response.content_type, body.len());
        if let Err(e) = write_response(&mut socket, head.as_bytes(), body).await {
            warn!("write error: {:?}", e);
        }
        socket.close();

        if reboot {
            warn!("Reboot requested over HTTP");
            Timer::after_secs(1).await;
            cortex_m::peripheral::SCB::sys_reset();
        }
    }
}

async fn write_response(
    socket: &mut TcpSocket<'_>,
    head: &[u8],
    body: &[u8],
) -> Result<(), embassy_net::tcp::Error> {
    socket.write_all(head).await?;
    socket.write_all(body).await?;
    socket.flush().await
}

/// Validate a request and hand it to the app task
async fn handle(route: Route, request: &Request) -> Response {
    match route {
        Route::Store(topic) => match parse_document(&request.body) {
            Ok(value) => {
                INBOUND.send(Inbound::Store(topic, value)).await;
                Response::status(Status::Ok)
            }
            Err(e) => Response::status(e.into()),
        },
        Route::SetTime => match parse_set_time(&request.body) {
            Ok(time) => {
                INBOUND.send(Inbound::SetTime(time)).await;
                Response::status(Status::Ok)
            }
            Err(e) => Response::status(e.into()),
        },
        Route::Data => query(Query::Data).await,
        Route::Info => query(Query::Info).await,
        Route::Reboot => Response::status(Status::Ok),
        Route::NotFound => Response::status(Status::NotFound),
    }
}

async fn query(query: Query) -> Response {
    REPLY.reset();
    INBOUND.send(Inbound::Query(query)).await;
    match with_timeout(QUERY_TIMEOUT, REPLY.wait()).await {
        Ok(Some(bytes)) => Response::json(bytes),
        Ok(None) | Err(_) => Response::status(Status::ServiceUnavailable),
    }
}
