use anyhow::Result;
use std::net::TcpListener;
use std::time::Duration;

use startpage::{ClientConfig, SearchOptions, StartpageClient, StartpageError};

mod test_helpers {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::SocketAddr;
    use std::thread::{self, JoinHandle};

    pub struct CannedResponse {
        pub status: &'static str,
        pub headers: Vec<(&'static str, String)>,
        pub body: Vec<u8>,
    }

    impl CannedResponse {
        pub fn new(status: &'static str, body: impl Into<Vec<u8>>) -> Self {
            Self {
                status,
                headers: vec![("Content-Type", "text/html; charset=utf-8".to_string())],
                body: body.into(),
            }
        }

        pub fn gzipped(mut self) -> Self {
            self.body = gzip_stored(&self.body);
            self.headers.push(("Content-Encoding", "gzip".to_string()));
            self
        }
    }

    /// Serves one canned response per connection, in order, then stops.
    /// Joining the handle yields the request lines it saw.
    pub fn serve(responses: Vec<CannedResponse>) -> (SocketAddr, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                seen.push(request_line.trim().to_string());

                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    let line = line.trim();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap();
                        }
                    }
                }
                let mut body = vec![0; content_length];
                reader.read_exact(&mut body).unwrap();

                let mut head = format!("HTTP/1.1 {}\r\n", response.status);
                for (name, value) in &response.headers {
                    head.push_str(&format!("{name}: {value}\r\n"));
                }
                head.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    response.body.len()
                ));
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(&response.body).unwrap();
                stream.flush().unwrap();
            }
            seen
        });
        (addr, handle)
    }

    /// gzip member holding one uncompressed deflate block.
    pub fn gzip_stored(data: &[u8]) -> Vec<u8> {
        let len = u16::try_from(data.len()).expect("fixture fits one stored block");
        let mut out = vec![0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 0xff];
        out.push(0x01);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(data);
        out.extend_from_slice(&crc32(data).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out
    }

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = !0u32;
        for byte in data {
            crc ^= u32::from(*byte);
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        !crc
    }

    pub fn client_for(base_url: String) -> StartpageClient {
        let config = ClientConfig::default()
            .with_base_url(base_url)
            .with_delay(Duration::ZERO)
            .with_timeout(Duration::from_secs(5));
        StartpageClient::new(config).unwrap()
    }
}

use test_helpers::*;

const ZIPPED_PAGE: &str = r#"<html><body>
    <div class="w-gl-result"><h3><a href="https://zip.example/">Zipped</a></h3></div>
</body></html>"#;

#[test]
fn test_gzip_body_is_decoded_and_status_codes_are_mapped() -> Result<()> {
    let (addr, server) = serve(vec![
        CannedResponse::new("200 OK", ZIPPED_PAGE).gzipped(),
        CannedResponse::new("429 Too Many Requests", "slow down"),
        CannedResponse::new("503 Service Unavailable", "later"),
        CannedResponse::new("200 OK", r#"["zi", ["zip", "zipper"]]"#),
    ]);
    let client = client_for(format!("http://{addr}"));

    let page = client.search("zip", &SearchOptions::new())?;
    let titles: Vec<_> = page.results.iter().map(|r| r.title()).collect();
    assert_eq!(titles, ["Zipped"]);

    let err = client.search("zip", &SearchOptions::new()).unwrap_err();
    match &err {
        StartpageError::RateLimited(message) => {
            assert_eq!(message, "Rate limit exceeded: 429 Too Many Requests")
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.search("zip", &SearchOptions::new()).unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, StartpageError::Http { status: 503, .. }));

    assert_eq!(client.suggestions("zi", "en")?, ["zip", "zipper"]);

    let seen = server.join().unwrap();
    assert!(seen[0].starts_with("POST /sp/search "));
    assert!(seen[3].starts_with("GET /suggestions?q=zi&"));
    Ok(())
}

#[test]
fn test_refused_connection_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_for(format!("http://127.0.0.1:{port}"));

    let err = client.search("rust", &SearchOptions::new()).unwrap_err();
    assert!(matches!(err, StartpageError::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[test]
fn test_invalid_proxy_is_rejected_up_front() {
    let config = ClientConfig::default().with_proxy("http://[::1");
    let err = StartpageClient::new(config).err().expect("proxy should be rejected");
    assert!(matches!(err, StartpageError::InvalidRequest(_)));
}
