use shiftflow::server;

fn main() {
    let mut args = std::env::args().skip(1);
    let listen_at = args.next().unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let queue_size = args.next().and_then(|v| v.parse().ok()).unwrap_or(16);
    let threads = args.next().and_then(|v| v.parse().ok()).unwrap_or(4);

    println!("Listening on {listen_at} ({threads} worker threads, queue {queue_size})");
    server::start_server(&listen_at, queue_size, threads);
}
