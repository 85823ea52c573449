//! REPLコマンド

/// REPLコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// メモリイメージを読み込む
    Load { path: String, base: Option<String> },
    /// アドレスの値を表示
    Print { kind: String, address: String },
    /// アドレスの値の合成子要素を名前で表示
    Child {
        kind: String,
        address: String,
        name: String,
    },
    /// ワード4つからベクタを表示
    Vector(Vec<String>),
    /// サイズとテキストから管理文字列を表示
    Str { size: String, text: String },
    /// バージョンとメソッドからRPCヘッダを表示
    Rpc { version: String, method: String },
    /// マップ済み領域一覧
    Regions,
    /// カテゴリ一覧
    Categories,
    /// カテゴリを有効化
    Enable(String),
    /// カテゴリを無効化
    Disable(String),
    /// ヘルプ表示
    Help,
    /// 終了
    Quit,
}

impl Command {
    /// コマンド文字列をパースする
    pub fn parse(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return None;
        }

        match parts[0] {
            "load" => match parts.len() {
                2 => Some(Command::Load {
                    path: parts[1].to_string(),
                    base: None,
                }),
                3 => Some(Command::Load {
                    path: parts[1].to_string(),
                    base: Some(parts[2].to_string()),
                }),
                _ => None,
            },
            "print" | "p" => {
                if parts.len() == 3 {
                    Some(Command::Print {
                        kind: parts[1].to_string(),
                        address: parts[2].to_string(),
                    })
                } else {
                    None
                }
            }
            "child" => {
                if parts.len() == 4 {
                    Some(Command::Child {
                        kind: parts[1].to_string(),
                        address: parts[2].to_string(),
                        name: parts[3].to_string(),
                    })
                } else {
                    None
                }
            }
            "vector" | "v" => {
                if parts.len() == 5 {
                    Some(Command::Vector(parts[1..].iter().map(|s| s.to_string()).collect()))
                } else {
                    None
                }
            }
            "string" | "s" => {
                if parts.len() >= 2 {
                    Some(Command::Str {
                        size: parts[1].to_string(),
                        text: parts[2..].join(" "),
                    })
                } else {
                    None
                }
            }
            "rpc" => {
                if parts.len() == 3 {
                    Some(Command::Rpc {
                        version: parts[1].to_string(),
                        method: parts[2].to_string(),
                    })
                } else {
                    None
                }
            }
            "regions" => Some(Command::Regions),
            "categories" | "cat" => Some(Command::Categories),
            "enable" if parts.len() == 2 => Some(Command::Enable(parts[1].to_string())),
            "disable" if parts.len() == 2 => Some(Command::Disable(parts[1].to_string())),
            "help" | "h" | "?" => Some(Command::Help),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}
