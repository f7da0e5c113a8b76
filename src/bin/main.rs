use qr_checkin::App;

#[tokio::main]
async fn main() -> qr_checkin::Result<()> {
    App::run().await
}
