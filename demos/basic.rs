use lsi_magnet::{
    Document, Grouping, Index, IntersectionMagnet, Magnet, Project, PruneConfig, Query, Word,
};
use tracing_subscriber::EnvFilter;

fn main() -> lsi_magnet::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // words already split out of identifiers, tagged with the methods they occur in
    let words = vec![
        Word::with_containers("box", 1, ["geo.Box#area", "geo.BoxShape#draw"]),
        Word::with_containers(
            "shape",
            1,
            ["geo.BoxShape#draw", "geo.Circle#draw", "geo.Square#draw"],
        ),
        Word::with_containers("area", 1, ["geo.Box#area", "geo.Circle#area", "geo.Square#area"]),
        Word::with_containers("radius", 1, ["geo.Circle#area"]),
        Word::with_containers("side", 1, ["geo.Square#area", "geo.Box#area"]),
        Word::with_containers("render", 1, ["gfx.Canvas#paint"]),
        Word::with_containers("pixel", 1, ["gfx.Canvas#paint", "gfx.Brush#stroke"]),
    ];

    let mut index = Index::create_index(&words)?;
    index.create_tfidf_matrix()?;
    println!("vocabulary: {}", index.word_list().len());
    println!("documents:  {}", index.doc_set().len());

    let query = Query::new(&index);
    let hits = query.method_search(&[Word::new("area"), Word::new("radius")])?;
    println!("methods about area/radius: {:#?}", hits);

    let circle = Document::from_container(0, "geo.Circle#area");
    let hits = query.type_search(&[circle])?;
    println!("words of geo.Circle#area: {:#?}", hits);

    for (i, group) in Grouping::group_words(&words)?.iter().enumerate() {
        let members: Vec<&str> = group.iter().map(Word::element).collect();
        println!("word group {i}: {members:?}");
    }

    let classes: Vec<Document> = [
        "CircleShape",
        "BoxShape",
        "Shape",
        "ShapeFactory",
        "ZebraShape",
        "Canvas",
        "CanvasPainter",
        "Brush",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| Document::from_container(i, &format!("geo.{name}")))
    .collect();
    let groups = Grouping::group_by_graph(&classes)?;
    let groups = Grouping::prune_doc_groups(groups, &PruneConfig::default())?;
    for (i, group) in groups.iter().enumerate() {
        let members: Vec<&str> = group.iter().map(Document::short_name).collect();
        println!("class group {i}: {members:?}");
    }

    let projects = vec![
        Project::from_tokens("geo", &["point", "line", "polygon", "area", "shape", "draw"]),
        Project::from_tokens("gfx", &["point", "line", "polygon", "area", "shape", "pixel"]),
        Project::from_tokens("net", &["socket", "packet", "route", "stream"]),
    ];
    for group in IntersectionMagnet::default().apply(&projects)?.iter() {
        let members: Vec<&str> = group.iter().map(Project::name).collect();
        println!("project group: {members:?}");
    }
    Ok(())
}
