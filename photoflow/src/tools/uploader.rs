//! Upload client backed by a command line uploader.

use async_trait::async_trait;

use super::{ExternalCommand, UploadClient, UploadRequest, UploaderSettings};
use crate::errors::ToolError;

/// Uploads by invoking the configured upload program once per file.
#[derive(Debug, Clone)]
pub struct CommandUploader {
    settings: UploaderSettings,
}

impl CommandUploader {
    /// Creates an uploader.
    #[must_use]
    pub fn new(settings: UploaderSettings) -> Self {
        Self { settings }
    }

    /// Builds the command for one upload.
    #[must_use]
    pub fn upload_command(&self, request: &UploadRequest) -> ExternalCommand {
        let s = &self.settings;
        let mut cmd = ExternalCommand::new(&s.program)
            .args(&s.args)
            .arg(&s.collection_flag)
            .arg(&request.collection)
            .arg(&s.owner_flag)
            .arg(&request.owner);
        if let Some(caption) = &request.caption {
            cmd = cmd.arg(&s.caption_flag).arg(caption);
        }
        cmd.arg(&request.file)
    }
}

#[async_trait]
impl UploadClient for CommandUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<(), ToolError> {
        self.upload_command(request).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn request(caption: Option<&str>) -> UploadRequest {
        UploadRequest {
            collection: "Summer 2024".to_string(),
            file: PathBuf::from("/photos/a_web.jpg"),
            owner: "alice".to_string(),
            caption: caption.map(str::to_string),
        }
    }

    fn args_of(cmd: &ExternalCommand) -> Vec<String> {
        cmd.arguments()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_upload_command_with_caption() {
        let uploader = CommandUploader::new(UploaderSettings::default());
        let cmd = uploader.upload_command(&request(Some("Beach")));

        assert_eq!(cmd.program(), "google");
        assert_eq!(
            args_of(&cmd),
            vec![
                "picasa",
                "post",
                "--title",
                "Summer 2024",
                "--owner",
                "alice",
                "--summary",
                "Beach",
                "/photos/a_web.jpg",
            ]
        );
    }

    #[test]
    fn test_upload_command_without_caption() {
        let uploader = CommandUploader::new(UploaderSettings {
            program: "upload".to_string(),
            args: Vec::new(),
            ..UploaderSettings::default()
        });
        let args = args_of(&uploader.upload_command(&request(None)));
        assert_eq!(
            args,
            vec!["--title", "Summer 2024", "--owner", "alice", "/photos/a_web.jpg"]
        );
    }
}
