use crate::TopicSet;

const MAINSTREAM: &[&str] = &[
    "Olaf Scholz",
    "Robert Habeck",
    "Friedrich Merz",
    "Christian Lindner",
    "Karl Lauterbach",
    "Annalena Baerbock",
    "Markus Söder",
    "Alice Weidel",
    "Sarah Wagenknecht",
    "Klimakrise",
    "Feminismus",
    "Corona",
    "Impfung",
    "Rassismus",
    "Sexismus",
    "Ukraine",
    "Selensky",
    "Russland",
    "Putin",
    "Inflation",
    "LGBTQ",
    "Joe Biden",
    "Cannabis",
    "Gendern",
    "Energiekrise",
];

const FRINGE: &[&str] = &[
    "Klimalüge",
    "Plandemie",
    "Impfschäden",
    "Genderwahn",
    "Cancel Culture",
    "Schuldkult",
    "Überfremdung",
    "Asylanten",
    "Sozialtourismus",
    "George Soros",
    "SED-Nachfolgepartei",
    "GrünInnen",
    "Transaktivismus",
    "Systemmedien",
    "Mainstreammedien",
    "Zwangsgebühren",
    "Staatsfunk",
    "Politikdarsteller",
    "Volkszorn",
    "Corona-Diktatur",
    "Ausländerkriminalität",
    "Kulturbereicherer",
    "Polit-Kaste",
    "Bevölkerungsaustausch",
    "Meinungsdiktatur",
];

/// Topic sets used when the configuration names none.
pub fn default_topic_sets() -> Vec<TopicSet> {
    vec![to_set("1", MAINSTREAM), to_set("2", FRINGE)]
}

fn to_set(name: &str, topics: &[&str]) -> TopicSet {
    TopicSet {
        name: name.to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}
