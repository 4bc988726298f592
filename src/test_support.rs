//! Shared fixtures for unit tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A small ta54 response: four rows, one missing wind reading, two trailing blank lines.
pub(crate) const SAMPLE_RESPONSE: &str = "Los Alamos National Laboratory Weather Machine\n\
Tower: ta54\n\
Interval: 15 minute\n\
Period: 2017-03-01 to 2017-03-02\n\
\n\
idx0\tyear\tmonth\tday\thour\tminute\tspd1\tdir1\ttemp0\n\
\t\t\t\t\t\tm/s\tdeg\tdeg C\n\
0\t2017\t3\t1\t0\t0\t4.2\t270\t1500\n\
1\t2017\t3\t1\t0\t15\t*\t265\t1450\n\
2\t2017\t3\t1\t0\t30\t3.1\t262\t1400\n\
3\t2017\t3\t1\t0\t45\t2.0\t\t2000\n\
\n\
\n";

/// Accepts one HTTP connection on a local port, answers it with `status_line`
/// and `body`, and yields the raw request text through the join handle.
pub(crate) async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/weathermachine", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        while !request_complete(&received) {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "{status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&received).into_owned()
    });

    (url, handle)
}

fn request_complete(received: &[u8]) -> bool {
    let text = String::from_utf8_lossy(received);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..split]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    received.len() >= split + 4 + content_length
}
