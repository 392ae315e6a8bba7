//! HTML report template.

use chrono::NaiveDateTime;
use metar_decode::DisplayModel;

/// Escape text for insertion into HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Footer line naming when the page was generated and where the data came from.
pub fn generated_notice(generated_at: NaiveDateTime) -> String {
    format!(
        "本页面由九号生成于 {}，数据源于XFlysim Network",
        generated_at.format("%Y年%m月%d日%H时%M分%S秒")
    )
}

/// Render a complete HTML document for one report.
pub fn render_html(model: &DisplayModel, generated_at: NaiveDateTime) -> String {
    tracing::debug!("Rendering HTML for {}", model.icao);
    let e = |s: &str| escape_html(s);
    let tiles = &model.summary;

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body {{ font-family: sans-serif; margin: 0; padding: 0; display: flex; justify-content: center; align-items: center; height: 100vh; background-color: #f4f4f4; }}
    .container {{ background-color: #fff; border-radius: 10px; box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1); padding: 20px; width: 90%; max-width: 800px; text-align: center; }}
    .header {{ font-size: 1.5em; margin-bottom: 10px; color: #333; }}
    .subheader {{ font-size: 0.8em; color: rgb(94, 94, 94); margin-bottom: 20px; }}
    .overview {{ display: flex; flex-wrap: wrap; gap: 16px; justify-content: center; margin-bottom: 20px; }}
    .overview div {{ flex: 1 1 calc(20% - 16px); min-width: 150px; background-color: #f9f9f9; padding: 10px; border: 1px solid #ddd; border-radius: 8px; text-align: center; }}
    .highlight {{ font-size: 1.2em; font-weight: bold; color: #555; }}
    .details {{ margin-top: 20px; text-align: left; }}
    .details p {{ margin: 5px 0; font-size: 0.9em; color: #555; }}
  </style>
  <title>METAR 报告</title>
</head>
<body>
  <div class="container">
    <div class="header">METAR 信息 - {icao}</div>
    <div class="subheader">{notice}</div>
    <div class="overview">
      <div>风向<br><span class="highlight">{tile_wind_dir}°</span></div>
      <div>风速<br><span class="highlight">{tile_wind_speed} m/s</span></div>
      <div>温度<br><span class="highlight">{tile_temperature}°C</span></div>
      <div>能见度<br><span class="highlight">{tile_visibility} {tile_visibility_unit}</span></div>
      <div>气压<br><span class="highlight">{tile_qnh} hPa</span></div>
    </div>
    <div class="details">
      <p><strong>时间：</strong>{time}</p>
      <p><strong>风向：</strong>{wind_dir}°</p>
      <p><strong>风速：</strong>{wind_speed} /{wind_unit}</p>
      <p><strong>能见度：</strong>{visibility} {visibility_unit}</p>
      <p><strong>天气现象：</strong>{weather}</p>
      <p><strong>温度：</strong>{temperature}°C</p>
      <p><strong>露点：</strong>{dewpoint}°C</p>
      <p><strong>气压：</strong>{qnh}   {qnh_unit}</p>
      <p><strong>云层状况：</strong>{clouds}</p>
      <p><strong>预报：</strong>{forecast}</p>
      <p><strong>Remark：</strong>{remark}</p>
      <p><strong>原始METAR：</strong>{raw_metar}</p>
    </div>
  </div>
</body>
</html>
"#,
        icao = e(&model.icao),
        notice = e(&generated_notice(generated_at)),
        tile_wind_dir = e(&tiles.wind_dir),
        tile_wind_speed = e(&tiles.wind_speed),
        tile_temperature = e(&tiles.temperature),
        tile_visibility = e(&tiles.visibility),
        tile_visibility_unit = e(&tiles.visibility_unit),
        tile_qnh = e(&tiles.qnh),
        time = e(&model.time),
        wind_dir = e(&model.wind_dir),
        wind_speed = e(&model.wind_speed),
        wind_unit = e(&model.wind_unit),
        visibility = e(&model.visibility),
        visibility_unit = e(&model.visibility_unit),
        weather = e(&model.weather),
        temperature = e(&model.temperature),
        dewpoint = e(&model.dewpoint),
        qnh = e(&model.qnh),
        qnh_unit = e(&model.qnh_unit),
        clouds = e(&model.clouds),
        forecast = e(&model.forecast),
        remark = e(&model.remark),
        raw_metar = e(&model.raw_metar),
    )
}
