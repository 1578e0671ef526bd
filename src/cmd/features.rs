use docform::catalog::FEATURES;
use docform::endpoint_for;

pub fn cmd_features() {
    for feature in FEATURES {
        println!("{:<12} POST {:<18} {}", feature.name, endpoint_for(feature.name), feature.shape);
        println!("             {}", feature.description);
        if !feature.required_fields.is_empty() {
            println!("             requires: {}", feature.required_fields.join(", "));
        }
    }
    println!("\n({} features)", FEATURES.len());
}
