use crate::render::ReportData;

/// Render a self-contained HTML catalog report (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(data: &ReportData) -> anyhow::Result<String> {
    let json = serde_json::to_string(data)?; // embedded as JS object literal

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Course Catalog</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .container { display: flex; height: calc(100vh - 58px); }
  .sidebar { width: 300px; border-right: 1px solid #ddd; padding: 12px; overflow: auto; }
  .main { flex: 1; padding: 12px; overflow: auto; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .pill.warn { border-color: #e0b4b4; background: #fff6f6; }

  .dept { cursor: pointer; user-select: none; padding: 4px 6px; border-radius: 4px; }
  .dept:hover { background: #f3f3f3; }
  .dept.selected { background: #e9f2ff; border: 1px solid #cfe3ff; }
  .muted { color: #777; font-size: 12px; }

  .course { border-bottom: 1px solid #eee; padding: 8px 4px; }
  .course-head { cursor: pointer; user-select: none; display: flex; gap: 8px; align-items: baseline; }
  .course-head:hover { background: #f9f9f9; }
  .course-id { font-weight: 600; }
  .badge { font-size: 11px; padding: 1px 6px; border-radius: 999px; border: 1px solid; }
  .badge.external { color: #a33; border-color: #e0b4b4; background: #fff6f6; }
  .badge.missing { color: #a33; border-color: #e0b4b4; }
  .badge.cycle { color: #b60; border-color: #e8c08c; }
  .badge.combinator { color: #357; border-color: #bcd; background: #f4f8fb; }

  .tree { margin: 4px 0 0 20px; font-size: 14px; }
  .tree ul { list-style: none; margin: 2px 0; padding-left: 18px; border-left: 1px dotted #ccc; }
  .tree li { padding: 1px 0; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="sidebar">
    <input id="search" placeholder="Search department..." style="width: 100%; box-sizing: border-box; padding: 6px 8px; border: 1px solid #ddd; border-radius: 6px; margin-bottom: 8px;">
    <div id="depts"></div>
  </div>

  <div class="main">
    <h2 id="title">Select a department</h2>
    <div id="meta" class="muted"></div>
    <div id="courses"></div>
  </div>
</div>

<script>
const DATA = __DATA__;

const state = {
  dept: null,
  open: new Set(),
  filter: "",
};

const esc = (s) => String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");

function renderSummary() {
  const t = DATA.totals;
  const pills = [
    `<span class="pill">departments: ${t.departments}</span>`,
    `<span class="pill">courses: ${t.courses}</span>`,
    `<span class="pill">min units: ${t.totalMinUnits}</span>`,
  ];
  if (t.missingReferences) pills.push(`<span class="pill warn">missing refs: ${t.missingReferences}</span>`);
  if (t.cycles) pills.push(`<span class="pill warn">cycles: ${t.cycles}</span>`);
  if (t.duplicateIds) pills.push(`<span class="pill warn">duplicate ids: ${t.duplicateIds}</span>`);
  if (t.malformedExpressions) pills.push(`<span class="pill warn">malformed: ${t.malformedExpressions}</span>`);
  document.getElementById("summary").innerHTML = pills.join("");
}

function renderDepts() {
  const box = document.getElementById("depts");
  const rows = [];
  for (const d of DATA.departments) {
    if (state.filter &&
        !d.deptId.toLowerCase().includes(state.filter) &&
        !d.deptName.toLowerCase().includes(state.filter)) continue;
    const cls = d.deptId === state.dept ? "dept selected" : "dept";
    const n = (DATA.courses[d.deptId] || []).length;
    rows.push(`<div class="${cls}" data-dept="${esc(d.deptId)}">` +
              `${esc(d.deptId)} <span class="muted">${esc(d.deptName)} · ${n}</span></div>`);
  }
  box.innerHTML = rows.join("");
  for (const el of box.querySelectorAll(".dept")) {
    el.onclick = () => selectDept(el.dataset.dept);
  }
}

function renderTreeNode(node) {
  if (node.kind === "group") {
    const items = node.children.map((c) => `<li>${renderTreeNode(c)}</li>`).join("");
    return `<span class="badge combinator">${node.combinator}</span><ul>${items}</ul>`;
  }
  if (node.kind === "missing") {
    return `<code>${esc(node.courseId)}</code> <span class="badge missing">not in catalog</span>`;
  }
  if (node.kind === "cycle") {
    return `<code>${esc(node.courseId)}</code> <span class="badge cycle">cycle</span>`;
  }
  // course leaf
  let html = `<code>${esc(node.courseId)}</code> <span class="muted">${esc(node.courseName)}</span>`;
  if (node.prereq) html += renderTreeNode(node.prereq);
  return html;
}

function renderCourses() {
  const box = document.getElementById("courses");
  if (!state.dept) { box.innerHTML = ""; return; }

  const external = new Set(DATA.external[state.dept] || []);
  const rows = [];
  for (const c of DATA.courses[state.dept] || []) {
    const open = state.open.has(c.courseId);
    const badge = external.has(c.courseId)
      ? ` <span class="badge external">cross-department</span>` : "";
    const deps = (DATA.edges[c.courseId] || []).length;
    let html = `<div class="course"><div class="course-head" data-course="${esc(c.courseId)}">` +
               `<span class="course-id">${esc(c.courseId)}</span>` +
               `<span>${esc(c.courseName)}</span>` +
               `<span class="muted">${esc(c.units)} units · ${deps} deps</span>${badge}</div>`;
    if (open && c.prereq) html += `<div class="tree">${renderTreeNode(c.prereq)}</div>`;
    if (open && !c.prereq) html += `<div class="tree muted">no prerequisites</div>`;
    html += `</div>`;
    rows.push(html);
  }
  box.innerHTML = rows.join("");
  for (const el of box.querySelectorAll(".course-head")) {
    el.onclick = () => {
      const id = el.dataset.course;
      if (state.open.has(id)) state.open.delete(id); else state.open.add(id);
      renderCourses();
    };
  }
}

function selectDept(deptId) {
  state.dept = deptId;
  state.open = new Set();
  const dept = DATA.departments.find((d) => d.deptId === deptId);
  document.getElementById("title").textContent = deptId;
  document.getElementById("meta").textContent = dept ? dept.deptName : "";
  renderDepts();
  renderCourses();
}

document.getElementById("search").addEventListener("input", (e) => {
  state.filter = e.target.value.trim().toLowerCase();
  renderDepts();
});

renderSummary();
renderDepts();
if (DATA.departments.length) selectDept(DATA.departments[0].deptId);
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
