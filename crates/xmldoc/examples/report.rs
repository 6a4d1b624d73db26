//! Builds a small course report three ways: marshalled from values,
//! edited through the tree API with observers attached, and filtered down
//! to a subset. Prints each serialized form.

use xmldoc::{filter, generate, Field, Marshal, Shape};

struct Course {
    name: String,
    kind: String,
    year: i64,
}

impl Marshal for Course {
    fn type_name(&self) -> Option<&str> {
        Some("Course")
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("name", &self.name).attribute(),
            Field::new("kind", &self.kind).attribute().rename("type"),
            Field::new("year", &self.year).attribute(),
        ])
    }
}

struct Student {
    number: i64,
    name: String,
    courses: Vec<Course>,
}

impl Marshal for Student {
    fn type_name(&self) -> Option<&str> {
        Some("Student")
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Record(vec![
            Field::new("number", &self.number).attribute(),
            Field::new("name", &self.name).attribute(),
            Field::new("courses", &self.courses),
        ])
    }
}

fn main() -> xmldoc::Result<()> {
    tracing_subscriber::fmt::init();

    let student = Student {
        number: 73132,
        name: "Oleh Petryna".to_string(),
        courses: vec![
            Course {
                name: "Telecommunications".to_string(),
                kind: "MSc".to_string(),
                year: 2022,
            },
            Course {
                name: "Computer Engineering".to_string(),
                kind: "BSc".to_string(),
                year: 2019,
            },
        ],
    };

    let mut document = generate(&student, None)?;
    println!("generated:\n{}\n", document.serialize());

    // watch the root while editing
    let root = document.root();
    let tree = document.tree_mut();
    tree.observe_entity(root, |event| println!("root changed: {event:?}"))?;

    let remark = tree.new_entity("remark")?;
    let text = tree.new_text("enrolled since 2019")?;
    tree.append_child(remark, text)?;
    tree.append_child(root, remark)?;
    println!("\nedited:\n{}\n", document.serialize());

    let masters_only = filter(document.tree(), document.root(), |node| {
        node.attr("type") == Some("MSc")
    })?;
    if let Some(masters) = masters_only {
        println!("filtered:\n{}", masters.serialize());
    }

    Ok(())
}
