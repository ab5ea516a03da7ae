//! Human readable index served at `/`.

use axum::response::Html;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Library API</title>
  <style>
    body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; color: #222; }
    code { background: #f3f3f3; padding: 0 0.25rem; }
    td { padding: 0.2rem 0.8rem 0.2rem 0; vertical-align: top; }
  </style>
</head>
<body>
  <h1>Library API</h1>
  <p>JSON endpoints for managing books and the authors who wrote them.
     Every response carries a <code>success</code> flag; failures add an <code>error</code> message.</p>

  <h2>Books</h2>
  <table>
    <tr><td><code>GET /api/books</code></td><td>All books</td></tr>
    <tr><td><code>GET /api/books/{id}</code></td><td>One book</td></tr>
    <tr><td><code>POST /api/books</code></td><td>Create from <code>title</code>, <code>author_id</code>, optional <code>year</code> and <code>isbn</code></td></tr>
    <tr><td><code>PUT /api/books/{id}</code></td><td>Change any of those fields</td></tr>
    <tr><td><code>DELETE /api/books/{id}</code></td><td>Remove a book</td></tr>
    <tr><td><code>GET /api/books/search?title=&amp;author=&amp;year=</code></td><td>Case-insensitive substring search, exact year</td></tr>
    <tr><td><code>GET /api/books/paginated?page=1&amp;per_page=5</code></td><td>One page of books with totals</td></tr>
    <tr><td><code>GET /api/books/sorted?sort=title&amp;order=desc</code></td><td>Sort by <code>id</code>, <code>title</code>, <code>year</code>, <code>isbn</code> or <code>created_at</code></td></tr>
  </table>

  <h2>Authors</h2>
  <table>
    <tr><td><code>GET /api/authors</code></td><td>All authors with their books</td></tr>
    <tr><td><code>GET /api/authors/{id}</code></td><td>One author</td></tr>
    <tr><td><code>POST /api/authors</code></td><td>Create from unique <code>name</code> and <code>city</code></td></tr>
    <tr><td><code>PUT /api/authors/{id}</code></td><td>Change <code>name</code> or <code>city</code></td></tr>
    <tr><td><code>DELETE /api/authors/{id}</code></td><td>Remove an author and all of their books</td></tr>
    <tr><td><code>GET /api/authors/search?name=&amp;city=&amp;title=</code></td><td>Match on author fields or the titles of their books</td></tr>
  </table>

  <h2>Examples</h2>
  <pre>curl -X POST http://127.0.0.1:5000/api/authors \
     -H 'Content-Type: application/json' \
     -d '{"name": "Eric Matthes", "city": "New York"}'

curl -X POST http://127.0.0.1:5000/api/books \
     -H 'Content-Type: application/json' \
     -d '{"title": "Python Crash Course", "year": 2019, "isbn": "978-1593279288", "author_id": 1}'

curl 'http://127.0.0.1:5000/api/books/search?author=matthes'
curl 'http://127.0.0.1:5000/api/books/sorted?sort=year&amp;order=desc'</pre>
</body>
</html>
"#;

/// Serve the endpoint overview
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
