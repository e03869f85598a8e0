//! Recipe image upload (admin only).

use std::path::Path;

use lopcafe_client::Route;
use lopcafe_client::api::UploadFile;

use super::Context;
use crate::error::CliError;
use crate::output;

pub async fn image(ctx: &Context, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("upload", Route::CreateRecipe)?;
    let file = UploadFile::from_path(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let uploaded = ctx.api.upload_image(file).await?;
    output::uploaded(&uploaded);
    Ok(())
}
