use reply::{Head, Method, Response, Settings, Sink, response::SendError};
use std::{io, sync::Arc};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::{TcpListener, TcpStream},
};

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let settings = Arc::new(
        Settings::new()
            .buffer_size(1024)
            .default_header("Server", "reply-example")
            .default_header("Connection", "close"),
    );

    let io = TcpListener::bind("0.0.0.0:3000").await?;
    loop {
        let (stream, addr) = io.accept().await?;
        let settings = Arc::clone(&settings);
        tokio::spawn(async move {
            if let Err(err) = handle(stream, settings).await {
                log::error!("{addr}: {err}");
            }
        });
    }
}

async fn handle(stream: TcpStream, settings: Arc<Settings>) -> io::Result<()> {
    let mut stream = BufReader::new(stream);

    let mut line = String::new();
    stream.read_line(&mut line).await?;
    let mut parts = line.split_whitespace();
    let method = parts.next().and_then(|m| m.parse().ok()).unwrap_or(Method::GET);
    let path = parts.next().unwrap_or("/").to_owned();

    // headers are not needed
    loop {
        line.clear();
        if stream.read_line(&mut line).await? == 0 || line == "\r\n" {
            break;
        }
    }

    log::info!("> {method} {path}");

    let head = match path.as_str() {
        "/" | "/stream" | "/empty" => Head::builder().content_type("text/plain; charset=utf-8"),
        "/chunked" => Head::builder().content_type("text/plain").chunked(true),
        _ => Head::builder().status(404),
    };
    let head = head.build().map_err(io::Error::other)?;

    let mut res = Response::new(head, method, settings, Sink::new(stream.into_inner()));
    if let Ok(json) = res.to_json() {
        log::debug!("{json}");
    }

    let delivery = respond(&mut res, &path).await.map_err(io::Error::other)?;
    match delivery.into_result() {
        Ok(body) => log::info!("< {} {body} bytes", res.head().status()),
        Err(err) => log::warn!("< {err}"),
    }
    Ok(())
}

async fn respond(res: &mut Response<TcpStream>, path: &str) -> Result<reply::Delivery, SendError> {
    match path {
        "/" => res.send_text("Hello World!\n").await,
        "/empty" => res.send_empty().await,
        "/stream" => res.send_stream(4096, tokio::io::repeat(b'a')).await,
        "/chunked" => {
            for word in ["streamed ", "in ", "chunks"] {
                let delivery = res.send_chunk(word).await?;
                if !delivery.is_complete() {
                    return Ok(delivery);
                }
            }
            res.send_final_chunk("\n").await
        }
        _ => res.send_text("Not Found\n").await,
    }
}
