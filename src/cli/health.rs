use crate::{backend::BackendClient, error, success, utils, warning};

pub async fn health() {
    let backend = BackendClient::from_config();

    let pb = utils::spinner(format!("Checking {}...", backend.base_url()));
    let result = backend.health().await;
    pb.finish_and_clear();

    match result {
        Ok(status) if status.status == "ok" => {
            success!("Backend at {} is {}.", backend.base_url(), status.status)
        }
        Ok(status) => warning!("Backend at {} reports '{}'.", backend.base_url(), status.status),
        Err(e) => error!("Backend at {} is unreachable: {}", backend.base_url(), e),
    }
}
