use envconfig::Envconfig;

use super::ContextConfig;

/// Per-process overrides layered on top of the selected context.
#[derive(Envconfig, Clone, Debug, Default)]
pub struct EnvOverrides {
    #[envconfig(from = "MLNANO_API_URL")]
    pub api_url: Option<String>,
    #[envconfig(from = "MLNANO_REALTIME_URL")]
    pub realtime_url: Option<String>,
    #[envconfig(from = "MLNANO_STORAGE_URL")]
    pub storage_url: Option<String>,
    #[envconfig(from = "MLNANO_BUCKET")]
    pub bucket: Option<String>,
    #[envconfig(from = "MLNANO_REGION")]
    pub region: Option<String>,
    #[envconfig(from = "MLNANO_IDENTITY_ID")]
    pub identity_id: Option<String>,
    #[envconfig(from = "MLNANO_AUTH_TOKEN")]
    pub auth_token: Option<String>,
}

impl EnvOverrides {
    pub fn apply(self, context: &mut ContextConfig) {
        fn set(slot: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
        set(&mut context.api_url, self.api_url);
        set(&mut context.realtime_url, self.realtime_url);
        set(&mut context.storage_url, self.storage_url);
        set(&mut context.bucket, self.bucket);
        set(&mut context.region, self.region);
        set(&mut context.identity_id, self.identity_id);
        set(&mut context.auth_token, self.auth_token);
    }
}
