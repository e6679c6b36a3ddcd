use std::io;

use sha2::{Digest, Sha256};
use strand::{Headers, Request, ResponseWriter, StatusCode, rt, service::from_fn};
use tokio::net::{TcpListener, TcpStream};

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let port: u16 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().expect("port must be a number"))
        .unwrap_or(13000);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    println!("Server started on port {port}");

    rt::serve(listener, from_fn(handle), shutdown()).await;
    Ok(())
}

async fn shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for ctrl-c: {err}");
    }
}

// ===== Routes =====

async fn handle(writer: ResponseWriter<TcpStream>, request: Request) {
    let Some(line) = request.request_line() else {
        return;
    };
    println!("> {} {} HTTP/{}", line.method(), line.target(), line.http_version());
    for (name, value) in request.headers().iter() {
        println!("> {name}: {value}");
    }

    let target = line.target().to_owned();

    let result = match target.as_str() {
        "/yourproblem" => plain(writer, StatusCode::BadRequest, PAGE_400).await,
        "/myproblem" => plain(writer, StatusCode::InternalServerError, PAGE_500).await,
        "/video" => video(writer).await,
        "/stream" => stream(writer).await,
        _ => plain(writer, StatusCode::Ok, PAGE_200).await,
    };

    if let Err(err) = result {
        eprintln!("failed to write response: {err}");
    }
}

async fn plain(
    mut writer: ResponseWriter<TcpStream>,
    status: StatusCode,
    page: &str,
) -> io::Result<()> {
    let mut headers = Headers::default_response(page.len() as u64);
    headers.replace("Content-Type", "text/html");

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await
}

async fn video(mut writer: ResponseWriter<TcpStream>) -> io::Result<()> {
    // a missing file is the handler's failure to recover, not the server's
    let file = match std::fs::read("assets/video.mp4") {
        Ok(file) => file,
        Err(_) => return plain(writer, StatusCode::InternalServerError, PAGE_500).await,
    };

    let mut headers = Headers::default_response(file.len() as u64);
    headers.replace("Content-Type", "video/mp4");

    writer.write_status_line(StatusCode::Ok).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(&file).await
}

/// Relay a body of unknown total length in 32 byte chunks, with integrity
/// trailers declared up front.
async fn stream(mut writer: ResponseWriter<TcpStream>) -> io::Result<()> {
    let payload = std::fs::read("assets/stream.txt").unwrap_or_else(|_| PAGE_200.into());

    writer.write_status_line(StatusCode::Ok).await?;

    let mut headers = Headers::default_response(0);
    headers.replace("Content-Type", "text/plain");
    let mut body = writer
        .begin_chunked(&mut headers, &["X-Content-SHA256", "X-Content-Length"])
        .await?;

    let mut hasher = Sha256::new();
    for chunk in payload.chunks(32) {
        hasher.update(chunk);
        body.write_chunk(chunk).await?;
    }

    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", hex(&hasher.finalize()));
    trailers.set("X-Content-Length", payload.len().to_string());
    body.finish(&trailers).await?;

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

// ===== Pages =====

const PAGE_200: &str = r#"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success</h1>
    <p>Your request is a banger.</p>
  </body>
</html>"#;

const PAGE_400: &str = r#"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request stinks.</p>
  </body>
</html>"#;

const PAGE_500: &str = r#"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>This one's on me, your majesty.</p>
  </body>
</html>"#;
