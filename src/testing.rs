//! Raw TCP servers for timeout tests; mockito always answers promptly.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// How long a connection is held open after the canned reply.
const HOLD: Duration = Duration::from_secs(5);

/// Accepts connections and never responds. Returns the base URL.
pub fn silent_server() -> String {
    stalling_server(b"")
}

/// Reads the request, writes `reply` verbatim, then keeps the connection open
/// without sending anything else. Returns the base URL.
pub fn stalling_server(reply: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            thread::spawn(move || {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(reply);
                let _ = stream.flush();
                thread::sleep(HOLD);
            });
        }
    });
    format!("http://127.0.0.1:{port}")
}
