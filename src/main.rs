#[tokio::main]
async fn main() {
    if let Err(e) = school_admin::run().await {
        eprintln!("school-admin-backend failed: {}", e);
        std::process::exit(1);
    }
}
