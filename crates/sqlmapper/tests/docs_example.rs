//! The bookshelf walkthrough from the crate docs, against a recording executor.

use sqlmapper::{
    Arg, Executor, MapperResult, RecordSchema, RecordedStatement, RecordingExecutor, Value, args, raw,
};
use std::sync::Arc;

struct Bookshelf {
    book: Arc<RecordSchema>,
    author: Arc<RecordSchema>,
    book_to_author: Arc<RecordSchema>,
    title_and_author: Arc<RecordSchema>,
}

fn bookshelf() -> MapperResult<Bookshelf> {
    Ok(Bookshelf {
        book: RecordSchema::builder("Book")
            .table("books")
            .field("id", "INTEGER")
            .field("title", "TEXT")
            .extra_ddl("PRIMARY KEY (id)")
            .build()?,
        author: RecordSchema::builder("Author")
            .table("authors")
            .field("id", "INTEGER")
            .field("name", "TEXT")
            .extra_ddl("PRIMARY KEY (id)")
            .build()?,
        book_to_author: RecordSchema::builder("BookToAuthor")
            .table("books_to_authors")
            .field("book_id", "INTEGER")
            .field("author_id", "INTEGER")
            .extra_ddl(
                "FOREIGN KEY (book_id) REFERENCES books(id),\
                 FOREIGN KEY (author_id) REFERENCES authors(id)",
            )
            .build()?,
        title_and_author: RecordSchema::builder("BookNameAndAuthorName")
            .untyped_field("book_title")
            .untyped_field("author_name")
            .build()?,
    })
}

#[test]
fn bookshelf_walkthrough() -> MapperResult<()> {
    let shelf = bookshelf()?;
    let mut exec = RecordingExecutor::default();

    exec.create_tables([&shelf.book, &shelf.author, &shelf.book_to_author])?;
    let ddl: Vec<String> = exec.take_statements().into_iter().map(|s| s.sql).collect();
    assert_eq!(
        ddl,
        [
            "CREATE TABLE IF NOT EXISTS books (id INTEGER,title TEXT,PRIMARY KEY (id))",
            "CREATE TABLE IF NOT EXISTS authors (id INTEGER,name TEXT,PRIMARY KEY (id))",
            "CREATE TABLE IF NOT EXISTS books_to_authors (book_id INTEGER,author_id INTEGER,\
             FOREIGN KEY (book_id) REFERENCES books(id),\
             FOREIGN KEY (author_id) REFERENCES authors(id))",
        ]
    );
    assert_eq!(exec.commits(), 1);

    let mut next_book_id: i64 = 1;
    for (author_id, (author_name, titles)) in [
        ("Michael Z.", ["My Great Book", "My Another Great Book"]),
        ("Anna S.", ["BOOK 1", "BOOK 2"]),
    ]
    .into_iter()
    .enumerate()
    {
        let author_id = author_id as i64 + 1;
        let mut book_ids = Vec::new();
        for title in titles {
            let book = shelf
                .book
                .from_ordered([Value::from(next_book_id), Value::from(title)])?;
            exec.execute("INSERT INTO ?", &args![book])?;
            book_ids.push(next_book_id);
            next_book_id += 1;
        }
        let author = shelf
            .author
            .from_ordered([Value::from(author_id), Value::from(author_name)])?;
        exec.execute("INSERT INTO ?", &args![author])?;

        let links = book_ids
            .into_iter()
            .map(|book_id| {
                shelf
                    .book_to_author
                    .from_ordered([book_id, author_id])
                    .map(|link| args![link])
            })
            .collect::<MapperResult<Vec<_>>>()?;
        exec.execute_many("INSERT INTO ?", &links)?;
    }
    exec.commit()?;
    assert_eq!(exec.commits(), 2);

    let inserts = exec.take_statements();
    assert_eq!(inserts.len(), 10);
    assert_eq!(
        inserts[0],
        RecordedStatement {
            sql: "INSERT INTO books(id,title)VALUES(?,?)".into(),
            params: vec![Value::Int(1), Value::from("My Great Book")],
        }
    );
    assert_eq!(inserts[2].sql, "INSERT INTO authors(id,name)VALUES(?,?)");
    assert_eq!(
        inserts[3],
        RecordedStatement {
            sql: "INSERT INTO books_to_authors(book_id,author_id)VALUES(?,?)".into(),
            params: vec![Value::Int(1), Value::Int(1)],
        }
    );
    assert_eq!(inserts[9].params, [Value::Int(4), Value::Int(2)]);

    exec.push_result(
        [
            ("My Great Book", "Michael Z."),
            ("My Another Great Book", "Michael Z."),
            ("BOOK 1", "Anna S."),
            ("BOOK 2", "Anna S."),
        ]
        .into_iter()
        .map(|(title, name)| vec![Value::from(title), Value::from(name)])
        .collect(),
    );
    let joined = exec
        .execute_as(
            "SELECT books.title, authors.name FROM books \
             INNER JOIN books_to_authors ON books_to_authors.book_id = books.id \
             INNER JOIN authors ON authors.id = books_to_authors.author_id",
            &[],
            &shelf.title_and_author,
        )?
        .collect::<MapperResult<Vec<_>>>()?;

    let expected = [
        ("My Great Book", "Michael Z."),
        ("My Another Great Book", "Michael Z."),
        ("BOOK 1", "Anna S."),
        ("BOOK 2", "Anna S."),
    ]
    .into_iter()
    .map(|(title, name)| shelf.title_and_author.from_ordered([title, name]))
    .collect::<MapperResult<Vec<_>>>()?;
    assert_eq!(joined, expected);
    assert_eq!(
        joined[0].to_string(),
        r#"BookNameAndAuthorName(book_title="My Great Book", author_name="Michael Z.")"#
    );
    Ok(())
}

#[test]
fn mixed_inserts_and_literal_question_mark() -> MapperResult<()> {
    let a = RecordSchema::builder("A")
        .table("a")
        .field("b", "INTEGER")
        .field("c", "TEXT")
        .extra_ddl("PRIMARY KEY (b)")
        .build()?;
    let mut exec = RecordingExecutor::default();
    exec.create_tables([&a])?;
    exec.take_statements();

    exec.execute_many(
        "INSERT INTO ?",
        &[
            args![a.from_ordered([Value::from(1), Value::from("a")])?],
            args![a.from_named([("c", "b")])?],
            args![a.from_named([("c", "c")])?],
        ],
    )?;

    // Scalars spread from a record's values behave like the record itself.
    let d = a.from_ordered([Value::from(4), Value::from("d")])?;
    let spread: Vec<Arg> = d.values().iter().cloned().map(Into::into).collect();
    exec.execute("INSERT INTO a VALUES (?, ?)", &spread)?;

    exec.execute("INSERT INTO a VALUES (?, " + raw("'?'") + ")", &args![5])?;

    let statements = exec.take_statements();
    let sqls: Vec<&str> = statements.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(
        sqls,
        [
            "INSERT INTO a(b,c)VALUES(?,?)",
            "INSERT INTO a(b,c)VALUES(?,?)",
            "INSERT INTO a(b,c)VALUES(?,?)",
            "INSERT INTO a VALUES (?, ?)",
            "INSERT INTO a VALUES (?, '?')",
        ]
    );
    assert_eq!(statements[1].params, [Value::Null, Value::from("b")]);
    assert_eq!(statements[3].params, [Value::Int(4), Value::from("d")]);
    assert_eq!(statements[4].params, [Value::Int(5)]);

    exec.push_result(vec![
        vec![Value::Int(1), Value::from("a")],
        vec![Value::Int(5), Value::from("?")],
    ]);
    let rows = exec
        .execute_as("SELECT * FROM a", &[], &a)?
        .collect::<MapperResult<Vec<_>>>()?;
    assert_eq!(
        rows,
        vec![
            a.from_ordered([Value::from(1), Value::from("a")])?,
            a.from_ordered([Value::from(5), Value::from("?")])?,
        ]
    );
    Ok(())
}
