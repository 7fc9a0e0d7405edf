use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lottery: LotteryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 快照文件路径
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: "lottery-data.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// 号码范围下界
    pub min_number: i64,
    /// 号码范围上界
    pub max_number: i64,
    /// 奖项配置（留空使用默认五档）
    #[serde(default = "default_prizes")]
    pub prizes: Vec<PrizeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeDefinition {
    pub id: String,
    pub name: String,
    pub total: i64,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        LotteryConfig {
            min_number: 1,
            max_number: 300,
            prizes: default_prizes(),
        }
    }
}

fn default_prizes() -> Vec<PrizeDefinition> {
    // 年会默认奖项阶梯
    [
        ("happiness", "幸运奖", 30),
        ("third", "三等奖", 10),
        ("second", "二等奖", 5),
        ("first", "一等奖", 3),
        ("special", "特等奖", 1),
    ]
    .into_iter()
    .map(|(id, name, total)| PrizeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        total,
    })
    .collect()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量与默认值
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    storage: StorageConfig {
                        path: get_env("STORAGE_PATH")
                            .unwrap_or_else(|| StorageConfig::default().path),
                    },
                    lottery: LotteryConfig {
                        min_number: get_env_parse("LOTTERY_MIN_NUMBER", 1i64),
                        max_number: get_env_parse("LOTTERY_MAX_NUMBER", 300i64),
                        prizes: default_prizes(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("STORAGE_PATH") {
            config.storage.path = v;
        }
        if let Ok(v) = env::var("LOTTERY_MIN_NUMBER")
            && let Ok(n) = v.parse()
        {
            config.lottery.min_number = n;
        }
        if let Ok(v) = env::var("LOTTERY_MAX_NUMBER")
            && let Ok(n) = v.parse()
        {
            config.lottery.max_number = n;
        }

        if config.lottery.min_number >= config.lottery.max_number {
            return Err(format!(
                "号码范围无效: min_number ({}) 必须小于 max_number ({})",
                config.lottery.min_number, config.lottery.max_number
            )
            .into());
        }

        Ok(config)
    }
}
