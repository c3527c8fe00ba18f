#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    instant_legal_server::run().await
}
