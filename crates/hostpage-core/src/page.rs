//! HTML page rendering
//!
//! A single fixed template with the collected host facts and the wall-clock
//! time substituted in. Every request gets this page regardless of method
//! or path.

use crate::SystemInfo;
use chrono::Local;

/// Timestamp format used in the page footer
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Docker Multi-Stage Build Demo</title>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <style>
        body {
            font-family: 'Arial', sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 15px;
            box-shadow: 0 8px 16px rgba(0, 0, 0, 0.1);
            width: 100%;
        }
        .header {
            display: flex;
            align-items: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #2980b9;
            padding-bottom: 15px;
        }
        .header i {
            font-size: 2.5em;
            color: #2980b9;
            margin-right: 15px;
        }
        .header h1 {
            color: #2c3e50;
            margin: 0;
            font-size: 2em;
        }
        .info-section {
            background: #f8f9fa;
            padding: 20px;
            border-radius: 8px;
            margin: 20px 0;
        }
        .info-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-top: 20px;
        }
        .info-item {
            padding: 10px;
            background: white;
            border-radius: 6px;
            border-left: 4px solid #3498db;
        }
        .info-item h3 {
            margin: 0 0 5px 0;
            color: #2980b9;
            font-size: 0.9em;
        }
        .info-item p {
            margin: 0;
            color: #34495e;
            font-size: 0.85em;
            word-break: break-all;
        }
        .timestamp {
            color: #7f8c8d;
            text-align: right;
            font-size: 0.9em;
            margin-top: 20px;
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <i class="fa-brands fa-docker"></i>
            <h1>Docker Multi-Stage Build Demo</h1>
        </div>
        <div class="info-section">
            <p>Welcome to our Rust application running in an optimized Docker container!</p>
            <p>This container was built using multi-stage builds for optimal size and performance.</p>
        </div>
        <div class="info-grid">
            <div class="info-item">
                <h3><i class="fas fa-microchip"></i> Hostname</h3>
                <p>{hostname}</p>
            </div>
            <div class="info-item">
                <h3><i class="fas fa-network-wired"></i> IP Addresses</h3>
                <p>{ip_addresses}</p>
            </div>
            <div class="info-item">
                <h3><i class="fas fa-server"></i> Platform</h3>
                <p>{platform} ({architecture})</p>
            </div>
            <div class="info-item">
                <h3><i class="fas fa-memory"></i> Memory</h3>
                <p>{memory}</p>
            </div>
            <div class="info-item">
                <h3><i class="fab fa-rust"></i> Rust Version</h3>
                <p>{rustc_version}</p>
            </div>
            <div class="info-item">
                <h3><i class="fas fa-clock"></i> Uptime</h3>
                <p>{uptime}</p>
            </div>
        </div>
        <div class="timestamp">
            Server Time: {timestamp}
        </div>
    </div>
</body>
</html>
"#;

/// Render the page for the given snapshot using the current local time.
pub fn render(info: &SystemInfo) -> String {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    render_with_timestamp(info, &timestamp)
}

fn render_with_timestamp(info: &SystemInfo, timestamp: &str) -> String {
    TEMPLATE
        .replace("{hostname}", &info.hostname)
        .replace("{ip_addresses}", &info.ip_addresses_joined())
        .replace("{platform}", &info.platform)
        .replace("{architecture}", &info.architecture)
        .replace("{memory}", &format!("{} GB", info.memory_gb))
        .replace("{rustc_version}", &info.rustc_version)
        .replace("{uptime}", &format!("{} minutes", info.uptime_minutes))
        .replace("{timestamp}", timestamp)
}
