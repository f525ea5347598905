/// Display names handed out at birth, purely for the viewer and lineage
/// displays.
pub static ANIMAL_NAMES: &[&str] = &[
    "Alba", "Basil", "Cleo", "Dandelion", "Echo", "Fennel", "Gumbo", "Hazel",
    "Ivy", "Juniper", "Koda", "Loki", "Maple", "Nimbus", "Olive", "Pip",
    "Quill", "Rusty", "Sage", "Tansy", "Umber", "Violet", "Wren", "Yarrow",
    "Ziggy", "Birch", "Clover", "Dove", "Ember", "Fern", "Gingko", "Heron",
    "Iris", "Jasper", "Kestrel", "Lark", "Moss", "Nettle", "Otter", "Poppy",
    "Reed", "Sorrel", "Thistle", "Willow",
];
