use axum::{response::Html, Router, routing::get};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Oxidized Agri - Agriculture Research Paper Finder</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, textarea { width: 100%; padding: 0.5rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; }
    .paper { border-top: 1px solid #eee; padding: 0.5rem 0; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Oxidized Agri</h1>
  <p>Find recent AI research papers on agriculture, summarize them with a local model, and store the result.</p>

  <div class="card">
    <label for="userId">User ID</label>
    <input id="userId" value="demo-user" />
    <label for="goal">Goal</label>
    <textarea id="goal" rows="3">Find the top 3 recent AI research papers on agriculture, summarize them, and store output.</textarea>
    <button id="runBtn">Run Agent</button>
    <div id="status"></div>
  </div>

  <div class="card">
    <h2>Papers</h2>
    <div id="papers"></div>
  </div>

  <div class="card">
    <h2>Structured Output</h2>
    <a id="download" style="display:none">Download JSON</a>
    <pre id="output"></pre>
  </div>

  <script>
    const runBtn = document.getElementById('runBtn');
    const statusEl = document.getElementById('status');
    const papersEl = document.getElementById('papers');
    const output = document.getElementById('output');
    const download = document.getElementById('download');

    function renderPapers(report) {
      papersEl.innerHTML = '';
      for (const paper of report.papers || []) {
        const div = document.createElement('div');
        div.className = 'paper';
        const link = document.createElement('a');
        link.href = paper.url;
        link.textContent = `${paper.rank_order}. ${paper.title}` + (paper.year ? ` (${paper.year})` : '');
        const summary = document.createElement('p');
        summary.textContent = paper.summary;
        div.appendChild(link);
        div.appendChild(summary);
        papersEl.appendChild(div);
      }
    }

    runBtn.addEventListener('click', async () => {
      const userId = document.getElementById('userId').value.trim();
      const goal = document.getElementById('goal').value.trim();
      if (!userId) {
        statusEl.textContent = 'Provide a user id.';
        return;
      }
      runBtn.disabled = true;
      statusEl.className = '';
      statusEl.textContent = 'Running autonomous workflow...';
      papersEl.innerHTML = '';
      download.style.display = 'none';
      try {
        const res = await fetch('/api/runs', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ user_id: userId, goal: goal || null })
        });
        const json = await res.json();
        const text = JSON.stringify(json, null, 2);
        output.textContent = text;
        if (!res.ok) {
          statusEl.className = 'error';
          statusEl.textContent = `Failed: ${json.error}`;
          return;
        }
        statusEl.textContent = 'Completed';
        renderPapers(json);
        const blob = new Blob([text], { type: 'application/json' });
        download.href = URL.createObjectURL(blob);
        download.download = `${json.job_id}.json`;
        download.style.display = 'inline';
      } catch (err) {
        statusEl.className = 'error';
        statusEl.textContent = `Request failed: ${err}`;
      } finally {
        runBtn.disabled = false;
      }
    });
  </script>
</body>
</html>"#)
}
